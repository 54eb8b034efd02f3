// The runtime ast representation of graphql source code entities. There are
// many data structures, but not many functions. The parser builds them and the
// schema builder and executor consume them.
mod names;
pub use names::*;

mod values;
pub use values::*;

mod schema;
pub use schema::*;

mod query;
pub use query::*;
