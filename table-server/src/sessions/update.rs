//! SessionUpdate - 字段级浅合并
//!
//! `None` 表示保持原值；可空字段使用 `Option<Option<T>>`，
//! `Some(None)` 表示清空。

use shared::models::{CartLine, TableSession, TableStatus};

/// 桌台会话的部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub status: Option<TableStatus>,
    pub customers: Option<u8>,
    pub cart: Option<Vec<CartLine>>,
    pub session_start: Option<Option<i64>>,
    pub order_time: Option<Option<i64>>,
    pub served_time: Option<Option<i64>>,
    pub customer_device: Option<Option<String>>,
}

impl SessionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: TableStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn customers(mut self, count: u8) -> Self {
        self.customers = Some(count);
        self
    }

    pub fn cart(mut self, cart: Vec<CartLine>) -> Self {
        self.cart = Some(cart);
        self
    }

    pub fn session_start(mut self, at: Option<i64>) -> Self {
        self.session_start = Some(at);
        self
    }

    pub fn order_time(mut self, at: Option<i64>) -> Self {
        self.order_time = Some(at);
        self
    }

    pub fn served_time(mut self, at: Option<i64>) -> Self {
        self.served_time = Some(at);
        self
    }

    pub fn customer_device(mut self, device: Option<String>) -> Self {
        self.customer_device = Some(device);
        self
    }

    /// 完整重置 (清台)：状态、人数、购物车与所有时间戳
    pub fn reset() -> Self {
        Self {
            status: Some(TableStatus::Empty),
            customers: Some(0),
            cart: Some(Vec::new()),
            session_start: Some(None),
            order_time: Some(None),
            served_time: Some(None),
            customer_device: Some(None),
        }
    }

    /// 覆盖到会话上 (不处理派生字段和 last_activity)
    pub fn apply_to(self, session: &mut TableSession) {
        if let Some(status) = self.status {
            session.status = status;
        }
        if let Some(customers) = self.customers {
            session.customers = customers;
        }
        if let Some(cart) = self.cart {
            session.cart = cart;
        }
        if let Some(at) = self.session_start {
            session.session_start = at;
        }
        if let Some(at) = self.order_time {
            session.order_time = at;
        }
        if let Some(at) = self.served_time {
            session.served_time = at;
        }
        if let Some(device) = self.customer_device {
            session.customer_device = device;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_fields_are_kept() {
        let mut session = TableSession::new("1");
        session.customers = 3;
        session.session_start = Some(10);

        SessionUpdate::new()
            .status(TableStatus::Served)
            .served_time(Some(20))
            .apply_to(&mut session);

        assert_eq!(session.status, TableStatus::Served);
        assert_eq!(session.customers, 3);
        assert_eq!(session.session_start, Some(10));
        assert_eq!(session.served_time, Some(20));
    }

    #[test]
    fn test_reset_clears_nullable_fields() {
        let mut session = TableSession::new("1");
        session.status = TableStatus::Ordered;
        session.order_time = Some(5);
        session.customer_device = Some("iPhone".into());

        SessionUpdate::reset().apply_to(&mut session);

        assert_eq!(session.status, TableStatus::Empty);
        assert!(session.order_time.is_none());
        assert!(session.customer_device.is_none());
    }
}
