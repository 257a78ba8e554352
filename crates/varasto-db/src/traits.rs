//! Conversion from SQLite rows into typed records.

use rusqlite::Row;

/// A type that can be built from one result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
