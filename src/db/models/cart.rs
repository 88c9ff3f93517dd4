//! Cart Model
//!
//! A cart is the set of `cart_items` rows for one user. Rows only exist
//! with quantity >= 1; merging down to zero deletes the row.

use serde::{Deserialize, Serialize};

/// A single cart line (user, product, desired quantity)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart view returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub user_id: i64,
    pub items: Vec<CartItem>,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
