//! Product Model
//!
//! `stock_quantity` and `sales_count` form the stock ledger: every unit
//! moved from stock to a sale updates both in the same SQL statement.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity (商品)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Live list price; orders snapshot it at creation time
    pub price: f64,
    /// Flat percentage discount, 0-100
    pub discount: f64,
    pub stock_quantity: i64,
    pub sales_count: i64,
    pub is_available: bool,
    /// Seller who listed the product
    pub creator_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    /// True when the product can be ordered at all
    pub fn is_purchasable(&self) -> bool {
        self.is_available && self.stock_quantity > 0
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub discount: f64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub is_available: bool,
}
