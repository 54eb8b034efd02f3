use crate::{ParserError, RequestError, SchemaError};
use thiserror::Error as ThisError;

/// Any error raised before execution produces a response.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Parser(ParserError),

    #[error("{0}")]
    Schema(SchemaError),

    #[error("{0}")]
    Request(RequestError),
}

impl From<ParserError> for Error {
    fn from(e: ParserError) -> Error {
        Error::Parser(e)
    }
}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Error {
        Error::Schema(e)
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Error {
        Error::Request(e)
    }
}
