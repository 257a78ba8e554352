pub mod changelog;
pub mod connection;
pub mod error;
pub mod migration;
pub mod models;
pub mod query;
pub mod repository;
pub mod traits;
pub mod value;

pub use connection::{backup_database, ensure_database, DbConnection};
pub use error::{DbError, Result};
pub use query::SearchQuery;
pub use traits::FromRow;
pub use value::{QueryResult, Row, SqlValue};
