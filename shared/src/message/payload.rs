use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ActivityEvent, TableSession};

// ==================== Payloads ====================

/// 初始快照载荷 (服务端 -> 新连接的观察者)
///
/// 连接时立即发送，保证新连接的大屏不依赖事件历史。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialTableStatesPayload {
    pub tables: BTreeMap<String, TableSession>,
    /// 最近活动 (最新在前)
    pub recent_activity: Vec<ActivityEvent>,
    pub timestamp: i64,
}

/// 桌台状态变更载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStateChangedPayload {
    pub table_id: String,
    pub state: TableSession,
    pub timestamp: i64,
}

/// 扫码访问结果载荷 (成功与失败均发送)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrScanAttemptPayload {
    pub table_id: String,
    pub success: bool,
    /// 失败原因 (仅失败时)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// 令牌签发后经过的秒数 (仅成功时)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_age_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub timestamp: i64,
}

/// 二维码签发载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrGeneratedPayload {
    pub table_id: String,
    pub token_id: String,
    pub expires_in_seconds: u64,
    pub timestamp: i64,
}

/// 对话消息载荷 (顾客消息 + 助手回复)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub table_id: String,
    pub message: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_performed: Option<String>,
    pub timestamp: i64,
}

/// 活动日志载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPayload {
    pub entry: ActivityEvent,
}
