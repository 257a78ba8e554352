//! Input types for repository operations.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::{
    error::{DbError, Result},
    query::{OrderSort, ProductSort, SortOrder},
};

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Product fields as submitted by the client.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ProductForm {
    #[serde(default)]
    pub arrival_date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub location_id: Option<i64>,
    pub state_id: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub order_id: Option<i64>,
    /// Attach the product to a newly created, empty order instead of `order_id`.
    #[serde(default)]
    pub new_order: bool,
}

impl ProductForm {
    /// Trims text fields, turns blank ones into `None` and checks required fields.
    pub fn normalized(&self) -> Result<Self> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(DbError::Validation("description is required".into()));
        }

        Ok(Self {
            arrival_date: non_blank(&self.arrival_date),
            description: description.to_string(),
            price: self.price,
            code: non_blank(&self.code),
            location_id: self.location_id,
            state_id: self.state_id,
            notes: non_blank(&self.notes),
            order_id: if self.new_order { None } else { self.order_id },
            new_order: self.new_order,
        })
    }

    /// Column values in the order `arrival_date, description, price, code,
    /// location_id, state_id, notes, order_id`.
    pub(crate) fn to_params(&self) -> Vec<Value> {
        vec![
            self.arrival_date.clone().into(),
            self.description.clone().into(),
            self.price.into(),
            self.code.clone().into(),
            self.location_id.into(),
            self.state_id.into(),
            self.notes.clone().into(),
            self.order_id.into(),
        ]
    }
}

/// Order and customer fields as submitted by the client.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct OrderForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub delivery_method_id: Option<i64>,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub reservation_number: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderForm {
    pub fn normalized(&self) -> Result<Self> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DbError::Validation("customer name is required".into()));
        }

        Ok(Self {
            name: name.to_string(),
            phone: non_blank(&self.phone),
            address: non_blank(&self.address),
            delivery_method_id: self.delivery_method_id,
            delivery_date: non_blank(&self.delivery_date),
            reservation_number: self.reservation_number,
            notes: non_blank(&self.notes),
        })
    }

    pub(crate) fn customer_params(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.phone.clone().into(),
            self.address.clone().into(),
        ]
    }

    /// `delivery_method_id, delivery_date, reservation_number, notes`
    pub(crate) fn order_params(&self) -> Vec<Value> {
        vec![
            self.delivery_method_id.into(),
            self.delivery_date.clone().into(),
            self.reservation_number.into(),
            self.notes.clone().into(),
        ]
    }
}

/// Inclusive bounds of a range filter. Either side may be open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Range {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl Range {
    /// Parses `start,end`. Missing or empty sides are open.
    pub fn parse(input: &str) -> Self {
        let (start, end) = input.split_once(',').unwrap_or((input, ""));
        let side = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            start: side(start),
            end: side(end),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Advanced product search.
///
/// For the multiselects `None` means no filter while `Some("")` selects nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdvancedSearch {
    pub code: Range,
    pub arrival_date: Range,
    pub delivery_date: Range,
    pub reservation_number: Range,
    pub price: Range,
    pub location: Option<String>,
    pub state: Option<String>,
    pub delivery_method: Option<String>,
    pub archived: Option<String>,
    pub regex: Option<String>,
    pub ignore_case: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProductSearch {
    /// Non-archived products.
    #[default]
    All,
    /// Non-archived products matching a case-insensitive pattern in any column.
    Quick(String),
    Advanced(AdvancedSearch),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: ProductSearch,
    pub sort: ProductSort,
    pub order: SortOrder,
    pub page: Page,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub sort: OrderSort,
    pub order: SortOrder,
    pub page: Page,
}
