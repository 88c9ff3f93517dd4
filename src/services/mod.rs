//! Service Layer
//!
//! Business logic between the HTTP handlers and the repositories:
//!
//! - [`order`] - order orchestration (create, transition, cancel, query)
//! - [`order_security`] - per-transition authorization decisions
//! - [`cart`] - per-user cart draft
//! - [`pricing`] - decimal money math and price snapshots

pub mod cart;
pub mod order;
pub mod order_security;
pub mod pricing;
