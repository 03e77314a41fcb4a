//! Connection configuration for SQLite databases.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use url::Url;

use super::{DbError, DbResult};

/// Where a database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

/// How to reach a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub location: Location,
    pub read_only: bool,
}

impl ConnectionConfig {
    pub fn memory() -> Self {
        Self {
            location: Location::Memory,
            read_only: false,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            read_only: false,
        }
    }

    /// Parse a database URL.
    ///
    /// Accepted forms:
    /// - `sqlite::memory:` or `:memory:`
    /// - `sqlite:///absolute/path.db`, `sqlite://relative/path.db`
    /// - a plain filesystem path
    ///
    /// A `mode=ro` query parameter opens the database read-only.
    pub fn from_url(url: &str) -> DbResult<Self> {
        let url = url.trim();
        if url == "sqlite::memory:" || url == ":memory:" || url == "sqlite://:memory:" {
            return Ok(Self::memory());
        }
        if !url.contains("://") {
            return Ok(Self::file(url));
        }

        let invalid = |reason: &str| DbError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
        if parsed.scheme() != "sqlite" {
            return Err(invalid(&format!("unsupported scheme '{}'", parsed.scheme())));
        }

        let path = match parsed.host_str().filter(|h| !h.is_empty()) {
            Some(host) => format!("{}{}", host, parsed.path()),
            None => parsed.path().to_string(),
        };
        if path.is_empty() {
            return Err(invalid("missing database path"));
        }
        let read_only = parsed
            .query_pairs()
            .any(|(k, v)| k == "mode" && v == "ro");

        Ok(Self {
            location: Location::File(PathBuf::from(path)),
            read_only,
        })
    }

    /// The same configuration pointed at a different database in the same
    /// directory. A name without an extension keeps the current one.
    pub fn with_dbname(&self, dbname: &str) -> Self {
        let location = match &self.location {
            Location::Memory => Location::Memory,
            Location::File(path) => {
                let mut next = path.with_file_name(dbname);
                if Path::new(dbname).extension().is_none() {
                    if let Some(ext) = path.extension() {
                        next.set_extension(ext);
                    }
                }
                Location::File(next)
            }
        };
        Self {
            location,
            read_only: self.read_only,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::Memory => None,
            Location::File(path) => Some(path),
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Open a connection.
pub fn connect(config: &ConnectionConfig) -> DbResult<Connection> {
    let conn = match &config.location {
        Location::Memory => Connection::open_in_memory()?,
        Location::File(path) if config.read_only => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?,
        Location::File(path) => Connection::open(path)?,
    };
    tracing::debug!(location = ?config.location, read_only = config.read_only, "opened database");
    Ok(conn)
}

/// Does the database exist? An in-memory database always does.
pub fn database_exists(config: &ConnectionConfig) -> bool {
    match &config.location {
        Location::Memory => true,
        Location::File(path) => path.is_file(),
    }
}

/// Create an empty database.
pub fn create_db(config: &ConnectionConfig) -> DbResult<()> {
    let Location::File(path) = &config.location else {
        return Ok(());
    };
    if path.exists() {
        return Err(DbError::AlreadyExists(path.clone()));
    }
    let conn = Connection::open(path)?;
    // Writing the header makes the file a valid database straight away.
    conn.pragma_update(None, "user_version", 0)?;
    conn.close().map_err(|(_, e)| DbError::Sqlite(e))?;
    tracing::info!(path = %path.display(), "created database");
    Ok(())
}
