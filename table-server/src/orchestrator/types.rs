//! 编排层的输入输出类型

use serde::{Deserialize, Serialize};
use shared::models::{CartLine, TableSession};

/// 二维码签发结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token_id: String,
    pub table_id: String,
    /// 顾客点餐页地址 (嵌入二维码)
    pub url: String,
    pub expires_in_seconds: u64,
    pub created_at: i64,
}

/// 扫码通过后的访问凭证
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub table_id: String,
    pub token_age_secs: u64,
    pub state: TableSession,
}

/// 购物车视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub table_id: String,
    pub cart: Vec<CartLine>,
    pub total_amount: i64,
    /// 数量合计
    pub item_count: u64,
    pub last_updated: Option<i64>,
}

impl CartView {
    pub fn from_session(session: &TableSession) -> Self {
        Self {
            table_id: session.table_id.clone(),
            cart: crate::sessions::cart::snapshot(session),
            total_amount: session.total_amount,
            item_count: session.item_count(),
            last_updated: session.last_activity,
        }
    }
}

/// 下单回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub table_state: TableSession,
    pub estimated_time: String,
}

/// 清台结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearOutcome {
    pub state: TableSession,
    pub tokens_revoked: usize,
    pub chat_dropped: bool,
}

/// 购物车操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartOperation {
    AddItem { menu_id: String, quantity: i64 },
    GetCart,
    CompleteOrder,
}

/// 购物车操作结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CartOutcome {
    Cart(CartView),
    Order(OrderReceipt),
}

/// 系统概况
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub active_tokens: usize,
    /// 状态非 empty 的桌台数
    pub active_tables: usize,
    pub total_tables: usize,
    pub total_sales: i64,
    pub active_chat_sessions: usize,
    pub uptime_secs: u64,
    pub server_start: i64,
}

/// 一轮对话的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub cart_updated: bool,
    pub action_performed: Option<String>,
    pub session_length: usize,
}
