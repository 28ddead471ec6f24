//! Table Session Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table status (桌台状态)
///
/// `Empty → Occupied → Ordering → Ordered → Served → Empty`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Empty,
    Occupied,
    Ordering,
    Ordered,
    Served,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Occupied => "occupied",
            Self::Ordering => "ordering",
            Self::Ordered => "ordered",
            Self::Served => "served",
        }
    }

    /// Whether a customer session is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One distinct menu item and its accumulated quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_id: String,
    pub name: String,
    /// Unit price in whole currency units
    pub price: i64,
    /// Always >= 1
    pub quantity: u32,
    pub category: String,
}

impl CartLine {
    /// `price × quantity`
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Table session snapshot (桌台会话快照)
///
/// Snapshots are owned copies; the registry never hands out live references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSession {
    pub table_id: String,
    pub status: TableStatus,
    /// Customer count (0..=20)
    pub customers: u8,
    /// Cart lines in insertion order
    pub cart: Vec<CartLine>,
    /// Derived: sum of `price × quantity` over `cart`
    pub total_amount: i64,
    pub session_start: Option<i64>,
    pub last_activity: Option<i64>,
    pub order_time: Option<i64>,
    pub served_time: Option<i64>,
    /// Last-known customer device descriptor (User-Agent)
    pub customer_device: Option<String>,
}

impl TableSession {
    /// Fresh `empty` session for an unseen table
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            status: TableStatus::Empty,
            customers: 0,
            cart: Vec::new(),
            total_amount: 0,
            session_start: None,
            last_activity: None,
            order_time: None,
            served_time: None,
            customer_device: None,
        }
    }

    /// Total quantity across all cart lines
    pub fn item_count(&self) -> u64 {
        self.cart.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = TableSession::new("4");
        assert_eq!(session.status, TableStatus::Empty);
        assert!(session.cart.is_empty());
        assert_eq!(session.total_amount, 0);
        assert!(session.last_activity.is_none());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TableStatus::Ordering).unwrap();
        assert_eq!(json, "\"ordering\"");
        assert!(!TableStatus::Empty.is_active());
        assert!(TableStatus::Served.is_active());
    }

    #[test]
    fn test_session_camel_case_fields() {
        let mut session = TableSession::new("7");
        session.cart.push(CartLine {
            menu_id: "drink_01".into(),
            name: "콜라".into(),
            price: 3000,
            quantity: 2,
            category: "drink".into(),
        });
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["tableId"], "7");
        assert_eq!(json["cart"][0]["menuId"], "drink_01");
        assert_eq!(session.item_count(), 2);
        assert_eq!(session.cart[0].line_total(), 6000);
    }

    #[test]
    fn test_item_count_does_not_overflow_u32() {
        let mut session = TableSession::new("3");
        for id in ["pasta_01", "pizza_01"] {
            session.cart.push(CartLine {
                menu_id: id.into(),
                name: id.into(),
                price: 1,
                quantity: u32::MAX,
                category: "main".into(),
            });
        }
        assert_eq!(session.item_count(), 2 * u64::from(u32::MAX));
    }
}
