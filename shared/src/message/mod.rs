//! 观察者事件类型定义
//!
//! 这些类型在 table-server 和观察者 (大屏、厨房、顾客设备) 之间共享。
//! 每个事件序列化为带 `type` 标签的 JSON 对象。

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod payload;
pub use payload::*;

/// 观察者事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// 连接时的全量快照
    InitialTableStates,
    /// 桌台状态变更
    TableStateChanged,
    /// 扫码访问尝试
    QrScanAttempt,
    /// 二维码签发
    QrGenerated,
    /// 对话消息
    NewMessage,
    /// 活动日志
    Activity,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::InitialTableStates => write!(f, "initial_table_states"),
            EventType::TableStateChanged => write!(f, "table_state_changed"),
            EventType::QrScanAttempt => write!(f, "qr_scan_attempt"),
            EventType::QrGenerated => write!(f, "qr_generated"),
            EventType::NewMessage => write!(f, "new_message"),
            EventType::Activity => write!(f, "activity"),
        }
    }
}

/// 观察者事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObserverEvent {
    InitialTableStates(InitialTableStatesPayload),
    TableStateChanged(TableStateChangedPayload),
    QrScanAttempt(QrScanAttemptPayload),
    QrGenerated(QrGeneratedPayload),
    NewMessage(NewMessagePayload),
    Activity(ActivityPayload),
}

impl ObserverEvent {
    /// 获取事件类型
    pub fn event_type(&self) -> EventType {
        match self {
            Self::InitialTableStates(_) => EventType::InitialTableStates,
            Self::TableStateChanged(_) => EventType::TableStateChanged,
            Self::QrScanAttempt(_) => EventType::QrScanAttempt,
            Self::QrGenerated(_) => EventType::QrGenerated,
            Self::NewMessage(_) => EventType::NewMessage,
            Self::Activity(_) => EventType::Activity,
        }
    }

    /// 关联的桌台 (快照事件无单一桌台)
    pub fn table_id(&self) -> Option<&str> {
        match self {
            Self::InitialTableStates(_) => None,
            Self::TableStateChanged(p) => Some(&p.table_id),
            Self::QrScanAttempt(p) => Some(&p.table_id),
            Self::QrGenerated(p) => Some(&p.table_id),
            Self::NewMessage(p) => Some(&p.table_id),
            Self::Activity(p) => p.entry.table_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TableSession, TableStatus};

    #[test]
    fn test_event_serializes_with_type_tag() {
        let mut state = TableSession::new("4");
        state.status = TableStatus::Occupied;
        let event = ObserverEvent::TableStateChanged(TableStateChangedPayload {
            table_id: "4".into(),
            state,
            timestamp: 1_700_000_000_000,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "table_state_changed");
        assert_eq!(json["tableId"], "4");
        assert_eq!(json["state"]["status"], "occupied");
        assert_eq!(event.event_type().to_string(), "table_state_changed");
    }

    #[test]
    fn test_failed_scan_omits_success_fields() {
        let event = ObserverEvent::QrScanAttempt(QrScanAttemptPayload {
            table_id: "2".into(),
            success: false,
            reason: Some("invalid_token".into()),
            token_age_secs: None,
            device: None,
            timestamp: 0,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["reason"], "invalid_token");
        assert!(json.get("tokenAgeSecs").is_none());
        assert_eq!(event.table_id(), Some("2"));
    }
}
