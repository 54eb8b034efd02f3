// turns source text into an iterator of lexed tokens.
mod lexer;
pub use lexer::{Lexer, LexerError, LexerIter, Pos, Token, TokenValue};

// The ast representation of schema and query documents. There are many data
// structures, but not many functions. The parser builds them; the schema
// builder and the executor consume them.
mod lang;
pub use lang::*;

// parser turns tokens into schema and query documents.
mod parser;
pub use parser::*;

// the type model, the registry holding it, and the two-phase builder that
// fills the registry from a schema document.
pub mod types;

mod registry;
pub use registry::{Schema, SchemaError, DEFAULT_QUERY_TYPE};

mod builder;
pub use builder::SchemaBuilder;

mod checker;
pub use checker::{InterfaceConformance, SchemaCheck};

// walks a query document against a schema and a set of resolvers.
pub mod exec;
pub use exec::{
    execute_query, Arguments, CancellationToken, ErrorKind, ExecutionError, Executor,
    ExecutorConfig, PathSegment, RequestError, Resolver, ResolverError, ResolverRegistry,
    Response, ResultNode, Strategy, TypeResolver, TypenameField,
};

mod error;
pub use error::Error;
