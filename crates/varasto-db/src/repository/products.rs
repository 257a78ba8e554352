//! Products: list, detail and writes.

use rusqlite::{types::Value, Connection};
use serde::Serialize;

use super::{
    fetch_one,
    lookups::{self, LookupTable},
};
use crate::{
    changelog::ChangeRecorder,
    error::{DbError, Result},
    models::{AdvancedSearch, ProductFilter, ProductForm, ProductSearch},
    value::{QueryResult, Row},
    SearchQuery,
};

const PRODUCT_SELECT: &str = "
SELECT
  T.id,
  T.arrival_date,
  T.description,
  T.price,
  T.code,
  L.description AS location,
  S.description AS state,
  D.description AS delivery_method,
  O.delivery_date AS delivery_date,
  O.reservation_number AS reservation_number,
  T.archived,
  T.notes,
  COUNT(*) OVER() AS total
FROM
  products T
  LEFT JOIN locations L ON T.location_id = L.id
  LEFT JOIN states S ON T.state_id = S.id
  LEFT JOIN orders O ON T.order_id = O.id
  LEFT JOIN delivery_methods D ON O.delivery_method_id = D.id
  LEFT JOIN customers C ON O.customer_id = C.id";

/// Every column free-text search looks at. NULLs read as `-`.
const SEARCH_TARGETS: &str = "IFNULL(T.arrival_date, '-'), \
     T.description, \
     IFNULL(T.price, '-'), \
     IFNULL(T.code, '-'), \
     IFNULL(L.description, '-'), \
     S.description, \
     IFNULL(D.description, '-'), \
     IFNULL(O.delivery_date, '-'), \
     IFNULL(CAST(O.reservation_number AS TEXT), '-'), \
     IFNULL(T.notes, '-')";

const PRODUCT_GET: &str = "
SELECT
  id, arrival_date, description, price, code, location_id, state_id, notes, order_id, archived
FROM products
WHERE id = ?";

const PRODUCT_INSERT: &str = "
INSERT INTO products
  (arrival_date, description, price, code, location_id, state_id, notes, order_id)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

const PRODUCT_UPDATE: &str = "
UPDATE products
SET
  arrival_date = ?,
  description = ?,
  price = ?,
  code = ?,
  location_id = ?,
  state_id = ?,
  notes = ?,
  order_id = ?
WHERE id = ?";

/// Outcome of a product write.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SavedProduct {
    pub id: i64,
    /// Set when the write created a new order for the product.
    pub new_order_id: Option<i64>,
}

pub fn list(conn: &Connection, filter: &ProductFilter) -> Result<QueryResult> {
    let mut query = SearchQuery::new();
    query.append_sql(PRODUCT_SELECT);

    match &filter.search {
        ProductSearch::All => {
            query.add_range("T.archived", Some("0"), Some("0"));
        }
        ProductSearch::Quick(pattern) => {
            query.add_range("T.archived", Some("0"), Some("0"));
            query.set_regex(SEARCH_TARGETS, pattern, true);
        }
        ProductSearch::Advanced(search) => apply_advanced(conn, &mut query, search)?,
    }

    if query.is_empty_result() {
        return Ok(QueryResult::empty());
    }

    query.append_where_clause();
    query.append_sql(format!(
        "\nORDER BY {} COLLATE NOCASE {}",
        filter.sort.as_sql(),
        filter.order.as_sql()
    ));
    query.append_pagination(filter.page.limit, filter.page.offset);
    query.execute(conn)
}

fn apply_advanced(conn: &Connection, query: &mut SearchQuery, search: &AdvancedSearch) -> Result<()> {
    let ranges = [
        ("CAST(T.code AS INTEGER)", &search.code),
        ("T.arrival_date", &search.arrival_date),
        ("O.delivery_date", &search.delivery_date),
        ("O.reservation_number", &search.reservation_number),
        ("T.price", &search.price),
    ];
    for (column, range) in ranges {
        query.add_range(column, range.start.as_deref(), range.end.as_deref());
    }

    // Nullable lookups offer the extra "-" option.
    if let Some(selection) = &search.location {
        let arity = lookups::count(conn, LookupTable::Locations)? + 1;
        query.add_multiselect("L.description", selection, arity);
    }
    if let Some(selection) = &search.state {
        let arity = lookups::count(conn, LookupTable::States)?;
        query.add_multiselect("S.description", selection, arity);
    }
    if let Some(selection) = &search.delivery_method {
        let arity = lookups::count(conn, LookupTable::DeliveryMethods)? + 1;
        query.add_multiselect("D.description", selection, arity);
    }
    if let Some(selection) = &search.archived {
        query.add_multiselect("T.archived", selection, 2);
    }

    if let Some(pattern) = search.regex.as_deref().filter(|p| !p.is_empty()) {
        query.set_regex(SEARCH_TARGETS, pattern, search.ignore_case);
    }
    Ok(())
}

pub fn get(conn: &Connection, id: i64) -> Result<Row> {
    fetch_one(conn, PRODUCT_GET, id, "Product")
}

/// Inserts an empty customer and an order for it, returning the order id.
fn insert_empty_order(recorder: &mut ChangeRecorder) -> Result<i64> {
    let customer_id = recorder.insert("INSERT INTO customers DEFAULT VALUES", &[])?;
    recorder.insert(
        "INSERT INTO orders (customer_id) VALUES (?)",
        &[Value::Integer(customer_id)],
    )
}

fn save(
    conn: &mut Connection,
    form: &ProductForm,
    id: Option<i64>,
) -> Result<SavedProduct> {
    let mut form = form.normalized()?;
    let mut recorder = ChangeRecorder::begin(conn)?;

    let new_order_id = if form.new_order {
        let order_id = insert_empty_order(&mut recorder)?;
        form.order_id = Some(order_id);
        Some(order_id)
    } else {
        None
    };

    let mut params = form.to_params();
    let id = match id {
        Some(id) => {
            params.push(Value::Integer(id));
            if recorder.execute(PRODUCT_UPDATE, &params)? == 0 {
                return Err(DbError::NotFound(format!("Product #{id}")));
            }
            id
        }
        None => recorder.insert(PRODUCT_INSERT, &params)?,
    };

    recorder.commit()?;
    Ok(SavedProduct { id, new_order_id })
}

pub fn create(conn: &mut Connection, form: &ProductForm) -> Result<SavedProduct> {
    save(conn, form, None)
}

pub fn update(conn: &mut Connection, id: i64, form: &ProductForm) -> Result<SavedProduct> {
    save(conn, form, Some(id))
}

pub fn set_archived(conn: &mut Connection, id: i64, archived: bool) -> Result<()> {
    let mut recorder = ChangeRecorder::begin(conn)?;
    let changed = recorder.execute(
        "UPDATE products SET archived = ? WHERE id = ?",
        &[Value::Integer(i64::from(archived)), Value::Integer(id)],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Product #{id}")));
    }
    recorder.commit()
}
