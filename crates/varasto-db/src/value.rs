//! Dynamic row values returned by [`SearchQuery::execute`](crate::SearchQuery::execute).

use rusqlite::types::{Value, ValueRef};
use serde::{ser::SerializeMap, Serialize, Serializer};

/// A single cell value.
///
/// Blobs are not stored by the schema; if one shows up it is decoded lossily as text.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                SqlValue::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

impl From<&Value> for SqlValue {
    fn from(value: &Value) -> Self {
        ValueRef::from(value).into()
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

/// An ordered column name to value mapping.
///
/// Keeps the projection order of the statement and serializes as a JSON object in
/// that order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(Vec<(String, SqlValue)>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
        self.0.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, column: &str) -> Option<SqlValue> {
        let index = self.0.iter().position(|(name, _)| name == column)?;
        Some(self.0.remove(index).1)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SqlValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, SqlValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rows of one page plus the number of rows matching the filters overall.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub total: i64,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_serializes_in_projection_order() {
        let row: Row = [
            ("zeta".to_string(), SqlValue::Integer(1)),
            ("alpha".to_string(), SqlValue::Null),
            ("mid".to_string(), SqlValue::Text("x".into())),
            ("price".to_string(), SqlValue::Real(2.5)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":null,"mid":"x","price":2.5}"#);
    }

    #[test]
    fn test_blob_decodes_lossily() {
        let value = SqlValue::from(ValueRef::Blob(b"ab\xffc"));
        assert_eq!(value, SqlValue::Text("ab\u{fffd}c".into()));
    }

    #[test]
    fn test_row_remove() {
        let mut row = Row::new();
        row.push("id", SqlValue::Integer(3));
        row.push("total", SqlValue::Integer(9));

        assert_eq!(row.remove("total"), Some(SqlValue::Integer(9)));
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id"]);
        assert_eq!(row.remove("total"), None);
    }

    #[test]
    fn test_empty_result_serialization() {
        let json = serde_json::to_value(QueryResult::empty()).unwrap();
        assert_eq!(json, serde_json::json!({"total": 0, "rows": []}));
    }
}
