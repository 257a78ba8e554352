pub mod health;
pub mod lookups;
pub mod orders;
pub mod products;

use serde::Serialize;

/// Body returned after creating an entity.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
}
