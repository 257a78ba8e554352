//! Option lists for the lookup tables.

use rusqlite::{Connection, Row};
use serde::Serialize;

use super::fetch_all;
use crate::{error::Result, traits::FromRow};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LookupOption {
    pub id: i64,
    pub description: String,
}

impl FromRow for LookupOption {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            description: row.get("description")?,
        })
    }
}

/// A non-archived order a product can be attached to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OpenOrder {
    pub id: i64,
    pub customer: Option<String>,
    pub delivery_date: Option<String>,
}

impl FromRow for OpenOrder {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            customer: row.get("customer")?,
            delivery_date: row.get("delivery_date")?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupTable {
    Locations,
    States,
    DeliveryMethods,
}

impl LookupTable {
    fn table(self) -> &'static str {
        match self {
            LookupTable::Locations => "locations",
            LookupTable::States => "states",
            LookupTable::DeliveryMethods => "delivery_methods",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Lookups {
    pub locations: Vec<LookupOption>,
    pub states: Vec<LookupOption>,
    pub delivery_methods: Vec<LookupOption>,
    pub open_orders: Vec<OpenOrder>,
}

fn options(conn: &Connection, table: LookupTable) -> Result<Vec<LookupOption>> {
    fetch_all(
        conn,
        &format!("SELECT id, description FROM {} ORDER BY id", table.table()),
    )
}

pub fn locations(conn: &Connection) -> Result<Vec<LookupOption>> {
    options(conn, LookupTable::Locations)
}

pub fn states(conn: &Connection) -> Result<Vec<LookupOption>> {
    options(conn, LookupTable::States)
}

pub fn delivery_methods(conn: &Connection) -> Result<Vec<LookupOption>> {
    options(conn, LookupTable::DeliveryMethods)
}

/// Non-archived orders, newest first.
pub fn open_orders(conn: &Connection) -> Result<Vec<OpenOrder>> {
    fetch_all(
        conn,
        "SELECT O.id, C.name AS customer, O.delivery_date
         FROM orders O LEFT JOIN customers C ON O.customer_id = C.id
         WHERE O.archived = 0
         ORDER BY O.id DESC",
    )
}

pub fn count(conn: &Connection, table: LookupTable) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table.table()),
        [],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(count).unwrap_or(0))
}

pub fn all(conn: &Connection) -> Result<Lookups> {
    Ok(Lookups {
        locations: locations(conn)?,
        states: states(conn)?,
        delivery_methods: delivery_methods(conn)?,
        open_orders: open_orders(conn)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_utils::setup_db;

    #[test]
    fn test_seeded_lookups() {
        let db = setup_db();
        let lookups = all(&db).unwrap();

        assert_eq!(lookups.states.len(), 3);
        assert_eq!(lookups.states[0].description, "In stock");
        assert_eq!(lookups.locations.len(), 2);
        assert_eq!(lookups.delivery_methods.len(), 2);
        assert!(lookups.open_orders.is_empty());
        assert_eq!(count(&db, LookupTable::States).unwrap(), 3);
    }

    #[test]
    fn test_open_orders_skip_archived() {
        let db = setup_db();
        db.execute_batch(
            "INSERT INTO customers (id, name) VALUES (1, 'Maija');
             INSERT INTO orders (id, customer_id) VALUES (1, 1);
             INSERT INTO orders (id, customer_id, archived) VALUES (2, 1, 1);
             INSERT INTO orders (id) VALUES (3);",
        )
        .unwrap();

        let orders = open_orders(&db).unwrap();
        assert_eq!(
            orders,
            vec![
                OpenOrder {
                    id: 3,
                    customer: None,
                    delivery_date: None
                },
                OpenOrder {
                    id: 1,
                    customer: Some("Maija".into()),
                    delivery_date: None
                },
            ]
        );
    }
}
