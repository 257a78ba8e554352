//! Sort keys accepted by list queries.
//!
//! Sort columns are interpolated into the statement text, so only the SQL
//! produced by these enums ever reaches `ORDER BY`.

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct ParseSortError {
    kind: &'static str,
    value: String,
}

impl ParseSortError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ParseSortError::new("sort order", s)),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = ParseSortError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort keys of the product list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ProductSort {
    #[default]
    Id,
    ArrivalDate,
    Description,
    Price,
    /// Codes are numeric strings and sort numerically.
    Code,
    Location,
    State,
    DeliveryMethod,
    DeliveryDate,
    ReservationNumber,
    Archived,
    Notes,
}

impl ProductSort {
    pub fn as_sql(self) -> &'static str {
        match self {
            ProductSort::Id => "T.id",
            ProductSort::ArrivalDate => "T.arrival_date",
            ProductSort::Description => "T.description",
            ProductSort::Price => "T.price",
            ProductSort::Code => "CAST(T.code AS INTEGER)",
            ProductSort::Location => "L.description",
            ProductSort::State => "S.description",
            ProductSort::DeliveryMethod => "D.description",
            ProductSort::DeliveryDate => "O.delivery_date",
            ProductSort::ReservationNumber => "O.reservation_number",
            ProductSort::Archived => "T.archived",
            ProductSort::Notes => "T.notes",
        }
    }
}

impl FromStr for ProductSort {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "id" => ProductSort::Id,
            "arrival_date" => ProductSort::ArrivalDate,
            "description" => ProductSort::Description,
            "price" => ProductSort::Price,
            "code" => ProductSort::Code,
            "location" => ProductSort::Location,
            "state" => ProductSort::State,
            "delivery_method" => ProductSort::DeliveryMethod,
            "delivery_date" => ProductSort::DeliveryDate,
            "reservation_number" => ProductSort::ReservationNumber,
            "archived" => ProductSort::Archived,
            "notes" => ProductSort::Notes,
            _ => return Err(ParseSortError::new("product sort key", s)),
        })
    }
}

impl TryFrom<String> for ProductSort {
    type Error = ParseSortError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Sort keys of the order list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum OrderSort {
    #[default]
    Id,
    DeliveryDate,
    ReservationNumber,
    DeliveryMethod,
    Customer,
    Products,
    Notes,
}

impl OrderSort {
    pub fn as_sql(self) -> &'static str {
        match self {
            OrderSort::Id => "O.id",
            OrderSort::DeliveryDate => "O.delivery_date",
            OrderSort::ReservationNumber => "O.reservation_number",
            OrderSort::DeliveryMethod => "D.description",
            OrderSort::Customer => "C.name",
            OrderSort::Products => "products",
            OrderSort::Notes => "O.notes",
        }
    }
}

impl FromStr for OrderSort {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "id" => OrderSort::Id,
            "delivery_date" => OrderSort::DeliveryDate,
            "reservation_number" => OrderSort::ReservationNumber,
            "delivery_method" => OrderSort::DeliveryMethod,
            "customer" => OrderSort::Customer,
            "products" => OrderSort::Products,
            "notes" => OrderSort::Notes,
            _ => return Err(ParseSortError::new("order sort key", s)),
        })
    }
}

impl TryFrom<String> for OrderSort {
    type Error = ParseSortError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_product_sort_sql() {
        assert_eq!(ProductSort::default().as_sql(), "T.id");
        assert_eq!(
            "code".parse::<ProductSort>().unwrap().as_sql(),
            "CAST(T.code AS INTEGER)"
        );
        assert_eq!(
            "location".parse::<ProductSort>().unwrap().as_sql(),
            "L.description"
        );
    }

    #[test]
    fn test_unknown_sort_key_is_rejected() {
        let err = "id; DROP TABLE products".parse::<ProductSort>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown product sort key `id; DROP TABLE products`"
        );
        assert!("T.id".parse::<OrderSort>().is_err());
    }

    #[test]
    fn test_deserialize_from_string() {
        let sort: OrderSort = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(sort, OrderSort::Customer);
        assert!(serde_json::from_str::<ProductSort>("\"bogus\"").is_err());
    }
}
