use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

/// A node of the `data` tree. Object keys keep selection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultNode {
    Object(IndexMap<String, ResultNode>),
    List(Vec<ResultNode>),
    Scalar(Value),
    Null,
}

impl ResultNode {
    pub fn is_null(&self) -> bool {
        matches!(self, ResultNode::Null)
    }

    /// Looks up an object member.
    pub fn get(&self, key: &str) -> Option<&ResultNode> {
        match self {
            ResultNode::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        to_json_value(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        PathSegment::Index(i)
    }
}

/// What went wrong while resolving a field. Serialized as `extensions.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    UnknownField,
    InvalidSelection,
    MissingRequiredArgument,
    ArgumentTypeMismatch,
    UnknownArgument,
    DuplicateArgument,
    ScalarCoercion,
    EnumValue,
    NullOnRequiredField,
    InterfaceResolution,
    Resolver,
    ExecutionCancelled,
}

/// Displays the serialized code, e.g. `NULL_ON_REQUIRED_FIELD`.
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match to_json_value(self) {
            Value::String(code) => f.write_str(&code),
            _ => Err(fmt::Error),
        }
    }
}

/// A field-scoped error, recorded once at the path where it happened.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message} at {}", display_path(.path))]
pub struct ExecutionError {
    pub message: String,
    pub path: Vec<PathSegment>,
    pub kind: ErrorKind,
}

impl ExecutionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, path: &[PathSegment]) -> ExecutionError {
        ExecutionError {
            message: message.into(),
            path: path.to_vec(),
            kind,
        }
    }
}

fn display_path(path: &[PathSegment]) -> String {
    let segments: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    segments.join(".")
}

impl Serialize for ExecutionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Extensions {
            code: ErrorKind,
        }

        let mut state = serializer.serialize_struct("ExecutionError", 3)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("extensions", &Extensions { code: self.kind })?;
        state.end()
    }
}

/// The outcome of one execution.
///
/// `data` is an object node, or null when a non-null failure bubbled all the
/// way up to the root. `errors` keeps the order fields appear in the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub data: ResultNode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ExecutionError>,
}

impl Response {
    pub fn new(data: ResultNode, errors: Vec<ExecutionError>) -> Response {
        Response { data, errors }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> Value {
        to_json_value(self)
    }
}

// every map in the result tree is keyed by strings, so this cannot fail
fn to_json_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}
