//! Database helpers: connections, introspection and SQL script execution.
//!
//! The backend is SQLite through `rusqlite`. Geometry column details are read
//! from a SpatiaLite-style `geometry_columns` table when one exists.

pub mod connection;
pub mod info;
pub mod introspect;
pub mod script;

pub use connection::{connect, create_db, database_exists, ConnectionConfig, Location};
pub use info::{ColumnInfo, GeometryInfo, TableInfo};
pub use introspect::{list_tables, table_info};
pub use script::{exec_sql, exec_sql_str, split_statements};

use std::path::PathBuf;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to tokenize SQL: {0}")]
    Tokenize(#[from] sqlparser::tokenizer::TokenizerError),

    #[error("Invalid database URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Database already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

pub type DbResult<T> = Result<T, DbError>;

/// Quote an identifier for interpolation into SQL.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
