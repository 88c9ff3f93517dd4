//! 订单权限判定
//!
//! Pure decision functions over `(order, actor, requested status)`.
//! Deny-by-default: a pair not in the table below is never allowed,
//! whoever asks.
//!
//! | current → requested    | who may act |
//! |------------------------|-------------|
//! | PENDING → PAID         | buyer       |
//! | PAID → SHIPPED         | seller      |
//! | SHIPPED → COMPLETED    | buyer       |
//! | PENDING → CANCELLED    | buyer       |
//! | PAID → CANCELLED       | buyer       |

use crate::db::models::{Order, OrderStatus};

/// Whether `actor_id` may move `order` to `requested`.
///
/// State-machine validity is the orchestrator's concern; this only
/// answers the "who" question for edges that exist.
pub fn can_update_status(order: &Order, actor_id: i64, requested: OrderStatus) -> bool {
    if order.status.is_terminal() {
        return false;
    }
    match (order.status, requested) {
        (OrderStatus::Pending, OrderStatus::Paid) => order.belongs_to_user(actor_id),
        (OrderStatus::Paid, OrderStatus::Shipped) => order.belongs_to_seller(actor_id),
        (OrderStatus::Shipped, OrderStatus::Completed) => order.belongs_to_user(actor_id),
        (OrderStatus::Pending, OrderStatus::Cancelled) => order.belongs_to_user(actor_id),
        (OrderStatus::Paid, OrderStatus::Cancelled) => order.belongs_to_user(actor_id),
        _ => false,
    }
}

/// Only the buyer may cancel an order
pub fn can_cancel_order(order: &Order, actor_id: i64) -> bool {
    order.belongs_to_user(actor_id)
}

/// Viewing is allowed for the buyer or the seller of the order, no one else
pub fn can_view_order(order: &Order, actor_id: i64) -> bool {
    order.belongs_to_user(actor_id) || order.belongs_to_seller(actor_id)
}
