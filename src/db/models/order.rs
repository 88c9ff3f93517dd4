//! Order Model & State Machine
//!
//! An order has an immutable identity and price snapshot; only `status`
//! and `updated_at` ever change, and `status` only moves along the edges
//! defined by [`OrderStatus::can_transition_to`].

use serde::{Deserialize, Serialize};

/// 订单状态
///
/// ```text
/// PENDING ──▶ PAID ──▶ SHIPPED ──▶ COMPLETED
///    │          │
///    └──────────┴─────▶ CANCELLED
/// ```
///
/// COMPLETED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states have no outgoing edges
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn can_pay(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    pub fn can_ship(&self) -> bool {
        matches!(self, OrderStatus::Paid)
    }

    pub fn can_complete(&self) -> bool {
        matches!(self, OrderStatus::Shipped)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Paid)
    }

    /// Refunds are modeled but not yet wired to a side effect
    pub fn can_refund(&self) -> bool {
        false
    }

    /// The full transition table; everything not listed is invalid
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self, next) {
            (OrderStatus::Pending, OrderStatus::Paid) => true,
            (OrderStatus::Paid, OrderStatus::Shipped) => true,
            (OrderStatus::Shipped, OrderStatus::Completed) => true,
            (OrderStatus::Pending, OrderStatus::Cancelled) => true,
            (OrderStatus::Paid, OrderStatus::Cancelled) => true,
            _ => false,
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity (订单) — one product per order
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    /// Buyer
    pub user_id: i64,
    /// Product creator at order time
    pub seller_id: i64,
    pub product_id: i64,
    /// Name snapshot, immune to later product edits
    pub product_name: String,
    pub quantity: i64,
    /// Price snapshot with discount applied, 2 decimal places
    pub unit_price: f64,
    /// unit_price × quantity, fixed at creation
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn belongs_to_user(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    pub fn belongs_to_seller(&self, seller_id: i64) -> bool {
        self.seller_id == seller_id
    }
}

/// Per-user order statistics
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderStatistics {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub total_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_edges_are_the_only_valid_ones() {
        let valid = [
            (OrderStatus::Pending, OrderStatus::Paid),
            (OrderStatus::Paid, OrderStatus::Shipped),
            (OrderStatus::Shipped, OrderStatus::Completed),
            (OrderStatus::Pending, OrderStatus::Cancelled),
            (OrderStatus::Paid, OrderStatus::Cancelled),
        ];
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let expected = valid.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {expected}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for from in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in OrderStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be invalid");
            }
        }
    }

    #[test]
    fn predicates_match_the_table() {
        assert!(OrderStatus::Pending.can_pay());
        assert!(OrderStatus::Paid.can_ship());
        assert!(OrderStatus::Shipped.can_complete());
        assert!(OrderStatus::Pending.can_cancel());
        assert!(OrderStatus::Paid.can_cancel());
        assert!(!OrderStatus::Shipped.can_cancel());
        assert!(!OrderStatus::Completed.can_cancel());
        assert!(!OrderStatus::Cancelled.can_pay());
    }

    #[test]
    fn status_round_trips_through_from_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("REFUNDED".parse::<OrderStatus>().is_err());
    }
}
