mod config;
pub use config::ParserConfig;

mod error;
pub use error::ParserError;

mod traits;

mod values;

mod schema;
pub use schema::*;

mod query;
pub use query::*;
