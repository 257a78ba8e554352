//! Query-string parameters of the list endpoints.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer};
use varasto_db::{
    models::{AdvancedSearch, OrderFilter, Page, ProductFilter, ProductSearch, Range},
    query::{OrderSort, ProductSort, SortOrder},
};

/// Treats a missing or empty parameter as `None` and parses the rest with `FromStr`.
fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}

fn range(param: &Option<String>) -> Range {
    param.as_deref().map(Range::parse).unwrap_or_default()
}

/// `GET /products` parameters.
///
/// Ranges are `start,end` with either side optional. Multiselects are
/// comma-separated descriptions where `-` selects unset values; an absent
/// parameter doesn't filter while an empty one matches nothing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductListParams {
    #[serde(deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub offset: Option<i64>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub sort: Option<ProductSort>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub order: Option<SortOrder>,
    pub search: Option<String>,
    pub advanced: bool,
    pub code: Option<String>,
    pub arrival_date: Option<String>,
    pub delivery_date: Option<String>,
    pub reservation_number: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub delivery_method: Option<String>,
    pub archived: Option<String>,
    pub regex_search: Option<String>,
    pub ignore_case: bool,
}

impl ProductListParams {
    pub fn into_filter(self, default_limit: Option<i64>) -> ProductFilter {
        let search = if self.advanced {
            ProductSearch::Advanced(AdvancedSearch {
                code: range(&self.code),
                arrival_date: range(&self.arrival_date),
                delivery_date: range(&self.delivery_date),
                reservation_number: range(&self.reservation_number),
                price: range(&self.price),
                location: self.location,
                state: self.state,
                delivery_method: self.delivery_method,
                archived: self.archived,
                regex: self.regex_search,
                ignore_case: self.ignore_case,
            })
        } else {
            match self.search {
                Some(pattern) if !pattern.is_empty() => ProductSearch::Quick(pattern),
                _ => ProductSearch::All,
            }
        };

        ProductFilter {
            search,
            sort: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            page: Page {
                limit: self.limit.or(default_limit),
                offset: self.offset,
            },
        }
    }
}

/// `GET /orders` parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderListParams {
    #[serde(deserialize_with = "empty_string_as_none")]
    pub limit: Option<i64>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub offset: Option<i64>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub sort: Option<OrderSort>,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub order: Option<SortOrder>,
}

impl OrderListParams {
    pub fn into_filter(self, default_limit: Option<i64>) -> OrderFilter {
        OrderFilter {
            sort: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            page: Page {
                limit: self.limit.or(default_limit),
                offset: self.offset,
            },
        }
    }
}
