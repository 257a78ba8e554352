//! Dynamic list queries.
//!
//! [`SearchQuery`] accumulates SQL fragments, bound parameters and filter
//! predicates for one list request and executes the composed statement once.

pub mod builder;
pub mod predicate;
pub mod sort;

pub use builder::SearchQuery;
pub use predicate::Predicate;
pub use sort::{OrderSort, ParseSortError, ProductSort, SortOrder};

/// Name of the scalar function registered for regex predicates.
pub const REGEX_FUNCTION: &str = "regex_match";

/// Window count column stripped from every returned row.
pub const TOTAL_COLUMN: &str = "total";

/// Selection value standing for "no value set" in multiselect filters.
pub const UNSET_SENTINEL: &str = "-";
