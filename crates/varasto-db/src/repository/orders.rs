//! Orders and their customers.

use rusqlite::{types::Value, Connection};

use super::fetch_one;
use crate::{
    changelog::ChangeRecorder,
    error::{DbError, Result},
    models::{OrderFilter, OrderForm},
    value::{QueryResult, Row},
    SearchQuery,
};

const ORDER_SELECT: &str = "
SELECT
  O.id,
  O.delivery_date,
  O.reservation_number,
  O.notes,
  O.archived,
  D.description AS delivery_method,
  C.name AS customer,
  C.phone AS customer_phone,
  C.address AS customer_address,
  C.notes AS customer_notes,
  GROUP_CONCAT(P.description, ', ') AS products,
  COUNT(*) OVER() AS total
FROM
  orders O
  LEFT JOIN delivery_methods D ON O.delivery_method_id = D.id
  LEFT JOIN customers C ON O.customer_id = C.id
  LEFT JOIN products P ON O.id = P.order_id";

// GROUP BY keeps a missing id from producing a row of NULLs.
const ORDER_GET: &str = "
SELECT
  O.id,
  O.delivery_method_id,
  O.delivery_date,
  O.reservation_number,
  O.notes,
  O.archived,
  C.name,
  C.phone,
  C.address,
  GROUP_CONCAT(P.description, ', ') AS products
FROM
  orders O
  LEFT JOIN customers C ON O.customer_id = C.id
  LEFT JOIN products P ON O.id = P.order_id
WHERE O.id = ?
GROUP BY O.id";

const ORDER_UPDATE: &str = "
UPDATE orders
SET
  delivery_method_id = ?,
  delivery_date = ?,
  reservation_number = ?,
  notes = ?
WHERE id = ?";

const CUSTOMER_UPDATE: &str = "
UPDATE customers
SET
  name = ?,
  phone = ?,
  address = ?
WHERE id = (SELECT customer_id FROM orders WHERE id = ? LIMIT 1)";

/// Non-archived orders with their customer and a comma-separated product list.
pub fn list(conn: &Connection, filter: &OrderFilter) -> Result<QueryResult> {
    let mut query = SearchQuery::new();
    query.append_sql(ORDER_SELECT);
    query.add_range("O.archived", Some("0"), Some("0"));
    query.append_where_clause();
    query.append_sql(format!(
        "\nGROUP BY O.id\nORDER BY {} COLLATE NOCASE {}",
        filter.sort.as_sql(),
        filter.order.as_sql()
    ));
    query.append_pagination(filter.page.limit, filter.page.offset);
    query.execute(conn)
}

pub fn get(conn: &Connection, id: i64) -> Result<Row> {
    fetch_one(conn, ORDER_GET, id, "Order")
}

pub fn create(conn: &mut Connection, form: &OrderForm) -> Result<i64> {
    let form = form.normalized()?;
    let mut recorder = ChangeRecorder::begin(conn)?;

    let customer_id = recorder.insert(
        "INSERT INTO customers (name, phone, address) VALUES (?, ?, ?)",
        &form.customer_params(),
    )?;

    let mut params = vec![Value::Integer(customer_id)];
    params.extend(form.order_params());
    let id = recorder.insert(
        "INSERT INTO orders
           (customer_id, delivery_method_id, delivery_date, reservation_number, notes)
         VALUES (?, ?, ?, ?, ?)",
        &params,
    )?;

    recorder.commit()?;
    Ok(id)
}

/// Updates the order and its customer. An order without a customer gets a new one.
pub fn update(conn: &mut Connection, id: i64, form: &OrderForm) -> Result<()> {
    let form = form.normalized()?;
    let mut recorder = ChangeRecorder::begin(conn)?;

    let mut params = form.order_params();
    params.push(Value::Integer(id));
    if recorder.execute(ORDER_UPDATE, &params)? == 0 {
        return Err(DbError::NotFound(format!("Order #{id}")));
    }

    let mut params = form.customer_params();
    params.push(Value::Integer(id));
    if recorder.execute(CUSTOMER_UPDATE, &params)? == 0 {
        let customer_id = recorder.insert(
            "INSERT INTO customers (name, phone, address) VALUES (?, ?, ?)",
            &form.customer_params(),
        )?;
        recorder.execute(
            "UPDATE orders SET customer_id = ? WHERE id = ?",
            &[Value::Integer(customer_id), Value::Integer(id)],
        )?;
    }

    recorder.commit()
}

pub fn set_archived(conn: &mut Connection, id: i64, archived: bool) -> Result<()> {
    let mut recorder = ChangeRecorder::begin(conn)?;
    let changed = recorder.execute(
        "UPDATE orders SET archived = ? WHERE id = ?",
        &[Value::Integer(i64::from(archived)), Value::Integer(id)],
    )?;
    if changed == 0 {
        return Err(DbError::NotFound(format!("Order #{id}")));
    }
    recorder.commit()
}
