//! Database Models

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartItem, CartView};
pub use order::{Order, OrderStatistics, OrderStatus};
pub use product::{Product, ProductCreate};
pub use user::{Role, User, UserCreate};
