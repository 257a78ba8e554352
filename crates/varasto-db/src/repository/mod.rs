//! Read and write operations on the inventory tables.

pub mod lookups;
pub mod orders;
pub mod products;

use rusqlite::{types::Value, Connection};

use crate::{
    error::{DbError, Result},
    traits::FromRow,
    value::Row,
    SearchQuery,
};

/// Runs a single-row lookup through [`SearchQuery`], mapping "no row" to
/// [`DbError::NotFound`].
fn fetch_one(conn: &Connection, sql: &str, id: i64, entity: &str) -> Result<Row> {
    let mut query = SearchQuery::new();
    query.append(sql, [Value::Integer(id)]);
    query
        .execute(conn)?
        .rows
        .into_iter()
        .next()
        .ok_or_else(|| DbError::NotFound(format!("{entity} #{id}")))
}

fn fetch_all<T: FromRow>(conn: &Connection, sql: &str) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], T::from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
