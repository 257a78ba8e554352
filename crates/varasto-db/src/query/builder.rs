//! The list query builder.

use std::time::Instant;

use regex::{Regex, RegexBuilder};
use rusqlite::{
    functions::FunctionFlags,
    params_from_iter,
    types::{Value, ValueRef},
    Connection,
};
use tracing::debug;

use super::{Predicate, REGEX_FUNCTION, TOTAL_COLUMN};
use crate::{
    error::Result,
    value::{QueryResult, Row, SqlValue},
};

/// Incrementally composed SELECT statement for one list request.
///
/// Fragments and their parameters are appended in order. Filter predicates are
/// collected separately and folded into a single WHERE clause by
/// [`append_where_clause`](Self::append_where_clause). Some filter inputs can only
/// ever match nothing (an empty multiselect, a malformed regex); those mark the
/// query as empty and [`execute`](Self::execute) then returns an empty result
/// without touching the database.
///
/// The statement must project a `COUNT(*) OVER() AS total` column for the total
/// row count to be reported.
///
/// # Example
///
/// ```rust
/// use rusqlite::Connection;
/// use varasto_db::SearchQuery;
///
/// let conn = Connection::open_in_memory().unwrap();
/// conn.execute_batch(
///     "CREATE TABLE t (code INTEGER);
///      INSERT INTO t VALUES (1), (2), (3), (4);",
/// ).unwrap();
///
/// let mut query = SearchQuery::new();
/// query.append_sql("SELECT code, COUNT(*) OVER() AS total FROM t");
/// query.add_range("code", Some("2"), None);
/// query.append_where_clause();
/// query.append_sql("ORDER BY code");
/// query.append_pagination(Some(1), None);
///
/// let result = query.execute(&conn).unwrap();
/// assert_eq!(result.total, 3);
/// assert_eq!(result.rows.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SearchQuery {
    fragments: Vec<String>,
    params: Vec<Value>,
    predicates: Vec<Predicate>,
    regex: Option<Regex>,
    no_results: bool,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw SQL fragment and its positional parameters.
    ///
    /// No separator is inserted between fragments.
    pub fn append<I>(&mut self, fragment: impl Into<String>, params: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.fragments.push(fragment.into());
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Filters `column` to a comma-separated selection of values.
    ///
    /// `max_arity` is the number of distinct options the column offers. Selecting
    /// all of them adds no condition; selecting none makes the whole query empty.
    /// The selection `-` additionally matches rows where the column is NULL.
    pub fn add_multiselect(&mut self, column: &str, value_list: &str, max_arity: usize) -> &mut Self {
        let values: Vec<&str> = value_list
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            self.no_results = true;
        } else if values.len() < max_arity {
            self.predicates.push(Predicate::membership(column, values));
        }
        self
    }

    /// Filters `column` to an inclusive range. Empty bounds count as absent.
    ///
    /// Bounds are bound as text; the column's affinity decides how they compare.
    pub fn add_range(&mut self, column: &str, start: Option<&str>, end: Option<&str>) -> &mut Self {
        if let Some(predicate) = Predicate::range(column, start, end) {
            self.predicates.push(predicate);
        }
        self
    }

    /// Filters rows to those where any of the comma-separated `target`
    /// expressions matches `pattern`.
    ///
    /// A pattern that fails to compile makes the whole query empty. Only one
    /// pattern is active per query; a later call replaces the compiled pattern.
    pub fn set_regex(&mut self, target: &str, pattern: &str, ignore_case: bool) -> &mut Self {
        match RegexBuilder::new(pattern)
            .case_insensitive(ignore_case)
            .build()
        {
            Ok(regex) => {
                self.regex = Some(regex);
                self.predicates.push(Predicate::new(
                    format!("{REGEX_FUNCTION}({target})"),
                    Vec::new(),
                ));
            }
            Err(err) => {
                debug!("Invalid regular expression: {err}");
                self.no_results = true;
            }
        }
        self
    }

    /// Folds all pending predicates into `WHERE p1 AND p2 ...`.
    ///
    /// Emits nothing when there are no predicates.
    pub fn append_where_clause(&mut self) -> &mut Self {
        if self.predicates.is_empty() {
            return self;
        }

        let mut conditions = Vec::with_capacity(self.predicates.len());
        for predicate in self.predicates.drain(..) {
            conditions.push(predicate.sql);
            self.params.extend(predicate.params);
        }
        self.fragments
            .push(format!("\nWHERE {}\n", conditions.join(" AND ")));
        self
    }

    /// Appends a raw SQL fragment that has no parameters.
    pub fn append_sql(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.fragments.push(fragment.into());
        self
    }

    /// Appends `LIMIT ? OFFSET ?`. An absent limit is unbounded, an absent offset is 0.
    pub fn append_pagination(&mut self, limit: Option<i64>, offset: Option<i64>) -> &mut Self {
        self.append(
            "\nLIMIT ? OFFSET ?\n",
            [limit.unwrap_or(-1), offset.unwrap_or(0)],
        )
    }

    pub fn is_empty_result(&self) -> bool {
        self.no_results
    }

    /// The statement composed so far.
    pub fn sql(&self) -> String {
        self.fragments.concat()
    }

    /// Parameters bound so far, excluding those of unfolded predicates.
    pub fn parameters(&self) -> &[Value] {
        &self.params
    }

    /// Predicates not yet folded into a WHERE clause.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Runs the composed statement.
    ///
    /// The regex function, if any, is registered on `conn` before the statement is
    /// prepared. The `total` column is taken from the first row and removed from
    /// every row.
    pub fn execute(self, conn: &Connection) -> Result<QueryResult> {
        if self.no_results {
            debug!("Skipping query that cannot match any rows");
            return Ok(QueryResult::empty());
        }

        if let Some(regex) = self.regex {
            register_regex_function(conn, regex)?;
        }

        let sql = self.fragments.concat();
        debug!("Executing query: {sql}");

        let start = Instant::now();
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(self.params.iter()))?;
        let mut total = None;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                let value = SqlValue::from(row.get_ref(idx)?);
                if name == TOTAL_COLUMN {
                    if total.is_none() {
                        total = value.as_i64();
                    }
                    continue;
                }
                values.push(name.clone(), value);
            }
            result.push(values);
        }
        debug!("Query time: {:?}", start.elapsed());

        Ok(QueryResult {
            total: total.unwrap_or(0),
            rows: result,
        })
    }
}

fn register_regex_function(conn: &Connection, regex: Regex) -> Result<()> {
    conn.create_scalar_function(
        REGEX_FUNCTION,
        -1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        move |ctx| {
            for idx in 0..ctx.len() {
                let matched = match ctx.get_raw(idx) {
                    ValueRef::Null => false,
                    ValueRef::Integer(i) => regex.is_match(&i.to_string()),
                    ValueRef::Real(f) => regex.is_match(&real_text(f)),
                    ValueRef::Text(t) | ValueRef::Blob(t) => {
                        regex.is_match(&String::from_utf8_lossy(t))
                    }
                };
                if matched {
                    return Ok(true);
                }
            }
            Ok(false)
        },
    )?;
    Ok(())
}

/// Renders a REAL the way SQLite casts it to text: `45.0`, `0.0001`, `1.0e+20`.
fn real_text(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-4..15).contains(&exponent) {
        let fixed = value.to_string();
        if fixed.contains('.') {
            fixed
        } else {
            format!("{fixed}.0")
        }
    } else {
        let point = if mantissa.contains('.') { "" } else { ".0" };
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}{point}e{sign}{:02}", exponent.abs())
    }
}
