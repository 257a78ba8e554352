//! Database connection management.
//!
//! Connections are short-lived: the server opens one per request and drops it
//! when the request's database work is done.

use std::{
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    time::Duration,
};

use rusqlite::{backup::Progress, Connection, DatabaseName, OpenFlags};
use tracing::{debug, info};
use varasto_utils::{fs::ensure_dir_exists, path::xdg_data_home};

use crate::{
    error::{DbError, Result},
    migration,
};

pub const DEFAULT_DB_NAME: &str = "varasto.sqlite3";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite connection with foreign keys enabled.
pub struct DbConnection {
    conn: Connection,
}

impl DbConnection {
    /// Opens a database connection and runs pending migrations.
    ///
    /// The file is created if it doesn't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut db = Self::open_without_migrations(path)?;
        db.conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
        migration::run_pending(&mut db.conn)?;
        Ok(db)
    }

    /// Opens a database connection without running migrations.
    ///
    /// Use this when you know the database is already migrated.
    pub fn open_without_migrations<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|err| DbError::ConnectionError(format!("{}: {err}", path.display())))?;
        Self::configure(conn)
    }

    /// Opens a migrated in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|err| DbError::ConnectionError(err.to_string()))?;
        let mut db = Self::configure(conn)?;
        migration::run_pending(&mut db.conn)?;
        Ok(db)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self { conn })
    }
}

impl Deref for DbConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for DbConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

/// `$XDG_DATA_HOME/varasto/varasto.sqlite3`, creating the data directory.
pub fn default_database_path() -> Result<PathBuf> {
    let dir = xdg_data_home().join("varasto");
    ensure_dir_exists(&dir)?;
    Ok(dir.join(DEFAULT_DB_NAME))
}

/// Makes sure the database at `path` (or the default location) exists and is
/// migrated, returning its path.
///
/// A new database is only created inside an existing directory.
pub fn ensure_database(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_database_path()?,
    };
    info!("database = {}", path.display());

    if !path.exists() {
        info!("Initializing database...");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if parent.is_file() {
                return Err(DbError::NotADirectory(parent.to_path_buf()));
            }
            if !parent.exists() {
                return Err(DbError::MissingParent(parent.to_path_buf()));
            }
        }
    }

    DbConnection::open(&path)?;
    Ok(path)
}

fn log_progress(progress: Progress) {
    debug!(
        "Copied {} of {} pages...",
        progress.pagecount - progress.remaining,
        progress.pagecount
    );
}

/// Copies the live database at `source` to `destination` using SQLite's online
/// backup.
pub fn backup_database(source: &Path, destination: &Path) -> Result<()> {
    let source = ensure_database(Some(source))?;
    let db = DbConnection::open_without_migrations(&source)?;

    info!("Backing up to {}...", destination.display());
    db.backup(DatabaseName::Main, destination, Some(log_progress))?;
    info!("Database backed up.");
    Ok(())
}
