//! Filter predicates and their bound parameters.

use rusqlite::types::Value;

use super::UNSET_SENTINEL;

/// One condition of a WHERE clause.
///
/// Owns its parameters until [`SearchQuery::append_where_clause`] moves them into
/// the statement's parameter list, so placeholders stay aligned with values no
/// matter in which order predicates and fragments were added.
///
/// [`SearchQuery::append_where_clause`]: super::SearchQuery::append_where_clause
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Predicate {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Builds an inclusive range condition. Empty bounds count as absent.
    ///
    /// Returns `None` when neither bound is given.
    pub fn range(column: &str, start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let start = start.filter(|s| !s.is_empty());
        let end = end.filter(|s| !s.is_empty());

        let predicate = match (start, end) {
            (Some(start), Some(end)) if start == end => {
                Self::new(format!("{column} = ?"), vec![text(start)])
            }
            (Some(start), Some(end)) => Self::new(
                format!("{column} BETWEEN ? AND ?"),
                vec![text(start), text(end)],
            ),
            (Some(start), None) => Self::new(format!("{column} >= ?"), vec![text(start)]),
            (None, Some(end)) => Self::new(format!("{column} <= ?"), vec![text(end)]),
            (None, None) => return None,
        };

        Some(predicate)
    }

    /// Builds a set membership condition from already split selections.
    ///
    /// The first [`UNSET_SENTINEL`] among the selections is not bound; it turns into
    /// an `IS NULL` alternative instead.
    pub fn membership(column: &str, mut values: Vec<&str>) -> Self {
        let include_null = match values.iter().position(|v| *v == UNSET_SENTINEL) {
            Some(index) => {
                values.remove(index);
                true
            }
            None => false,
        };

        if values.is_empty() {
            return Self::new(format!("({column} IS NULL)"), Vec::new());
        }

        let placeholders = vec!["?"; values.len()].join(", ");
        let null_clause = if include_null {
            format!(" OR {column} IS NULL")
        } else {
            String::new()
        };

        Self::new(
            format!("({column} IN ({placeholders}){null_clause})"),
            values.into_iter().map(text).collect(),
        )
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_variants() {
        let eq = Predicate::range("price", Some("5"), Some("5")).unwrap();
        assert_eq!(eq.sql, "price = ?");
        assert_eq!(eq.params, vec![text("5")]);

        let between = Predicate::range("price", Some("1"), Some("9")).unwrap();
        assert_eq!(between.sql, "price BETWEEN ? AND ?");
        assert_eq!(between.params, vec![text("1"), text("9")]);

        let lower = Predicate::range("price", Some("1"), Some("")).unwrap();
        assert_eq!(lower.sql, "price >= ?");

        let upper = Predicate::range("price", None, Some("9")).unwrap();
        assert_eq!(upper.sql, "price <= ?");
        assert_eq!(upper.params, vec![text("9")]);

        assert!(Predicate::range("price", Some(""), None).is_none());
    }

    #[test]
    fn test_membership_with_sentinel() {
        let p = Predicate::membership("location", vec!["A", "-"]);
        assert_eq!(p.sql, "(location IN (?) OR location IS NULL)");
        assert_eq!(p.params, vec![text("A")]);
    }

    #[test]
    fn test_membership_sentinel_only() {
        let p = Predicate::membership("location", vec!["-"]);
        assert_eq!(p.sql, "(location IS NULL)");
        assert!(p.params.is_empty());
    }

    #[test]
    fn test_membership_removes_only_first_sentinel() {
        let p = Predicate::membership("code", vec!["-", "-"]);
        assert_eq!(p.sql, "(code IN (?) OR code IS NULL)");
        assert_eq!(p.params, vec![text("-")]);
    }
}
