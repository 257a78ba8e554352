//! Embedded schema migrations tracked through `PRAGMA user_version`.

use include_dir::{include_dir, Dir};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{DbError, Result};

pub static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");

#[derive(Debug)]
pub struct Migration {
    pub version: i32,
    pub name: String,
    sql: String,
}

/// Loads `V<version>_<name>.sql` files from `dir`, sorted by version.
///
/// Files that don't follow the naming scheme are ignored.
pub fn load_migrations(dir: &Dir) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();

    for entry in dir.files() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("sql") {
            continue;
        }

        let Some(filename) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((version, name)) = filename
            .strip_prefix('V')
            .and_then(|rest| rest.split_once('_'))
        else {
            continue;
        };

        let version = version.parse::<i32>().map_err(|_| {
            DbError::MigrationError(format!("Invalid version number in filename: {filename}"))
        })?;
        let sql = entry.contents_utf8().ok_or_else(|| {
            DbError::MigrationError(format!("Migration {filename} is not valid UTF-8"))
        })?;

        migrations.push(Migration {
            version,
            name: name.to_string(),
            sql: sql.to_string(),
        });
    }

    migrations.sort_by_key(|m| m.version);
    Ok(migrations)
}

pub fn schema_version(conn: &Connection) -> Result<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Applies every migration newer than the database's `user_version`.
///
/// Each migration runs in its own transaction together with the version bump.
pub fn run_pending(conn: &mut Connection) -> Result<()> {
    let migrations = load_migrations(&MIGRATIONS_DIR)?;
    let current = schema_version(conn)?;

    if let Some(latest) = migrations.last() {
        if current > latest.version {
            return Err(DbError::MigrationError(format!(
                "database schema v{current} is newer than the supported v{}",
                latest.version
            )));
        }
    }

    for migration in migrations.iter().filter(|m| m.version > current) {
        info!("Applying migration V{} ({})", migration.version, migration.name);
        let tx = conn.transaction()?;
        tx.execute_batch(&migration.sql).map_err(|err| {
            DbError::MigrationError(format!("V{}_{}: {err}", migration.version, migration.name))
        })?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
    }

    debug!("Database schema at v{}", schema_version(conn)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_ordered() {
        let migrations = load_migrations(&MIGRATIONS_DIR).unwrap();
        let versions: Vec<i32> = migrations.iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert_eq!(migrations[0].name, "schema");
    }

    #[test]
    fn test_run_pending_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_pending(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 2);

        run_pending(&mut conn).unwrap();
        let states: i64 = conn
            .query_row("SELECT COUNT(*) FROM states", [], |row| row.get(0))
            .unwrap();
        assert_eq!(states, 3);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 99).unwrap();
        assert!(matches!(
            run_pending(&mut conn),
            Err(DbError::MigrationError(_))
        ));
    }
}
