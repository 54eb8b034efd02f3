use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken as Signal;

/// Stops an execution from starting any more fields.
///
/// Clones share the same signal, so a token handed to an execution can be
/// cancelled from another thread. Fields that already started run to
/// completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    signal: Signal,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    /// A token that also counts as cancelled once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> CancellationToken {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> CancellationToken {
        self.with_deadline(Instant::now() + timeout)
    }

    /// A token cancelled along with this one, but not the other way round.
    pub fn child_token(&self) -> CancellationToken {
        CancellationToken {
            signal: self.signal.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.signal.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        if self.signal.is_cancelled() {
            return true;
        }
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn children_follow_their_parent_only() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let child = parent.child_token();
        parent.cancel();
        assert!(child.is_cancelled());
    }

    #[test]
    fn cancelling_from_another_thread_is_seen() {
        let token = CancellationToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }

    #[test]
    fn deadlines_expire() {
        let past = CancellationToken::new().with_deadline(Instant::now());
        assert!(past.is_cancelled());
        let future = CancellationToken::new().with_timeout(Duration::from_secs(3600));
        assert!(!future.is_cancelled());
    }
}
