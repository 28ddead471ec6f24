//! 事件广播器
//!
//! # 架构
//!
//! ```text
//! SessionRegistry ──on_commit()──┐
//! Orchestrator ──qr/message()────┤
//!                                ▼
//!                  ┌──────────────────────────────┐
//!                  │       EventBroadcaster       │
//!                  │  broadcast::Sender<Event>    │
//!                  │  ActivityLog (最近 N 条)      │
//!                  └──────────────┬───────────────┘
//!                                 │
//!           ┌─────────────────────┼─────────────────────┐
//!           ▼                     ▼                     ▼
//!       Dashboard              Kitchen            Customer device
//! ```
//!
//! 发布是即发即弃的：没有订阅者或订阅者落后都不会阻塞或失败发布方。
//! 新连接先订阅、再取快照，保证不会漏掉快照之后的变更。

use std::collections::BTreeMap;
use std::sync::Arc;

use shared::message::{
    ActivityPayload, InitialTableStatesPayload, NewMessagePayload, ObserverEvent,
    QrGeneratedPayload, QrScanAttemptPayload, TableStateChangedPayload,
};
use shared::models::{AccessToken, ActivityEvent, ActivityLevel, TableSession, TableStatus};
use tokio::sync::broadcast;

use super::ActivityLog;
use crate::sessions::SessionObserver;
use crate::utils::Clock;

/// 默认广播通道容量
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// 扫码结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanAttempt {
    pub table_id: String,
    pub success: bool,
    pub reason: Option<String>,
    pub token_age_secs: Option<u64>,
    pub device: Option<String>,
}

/// 观察者事件广播器
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<ObserverEvent>,
    activity: Arc<ActivityLog>,
    clock: Arc<dyn Clock>,
}

impl EventBroadcaster {
    pub fn new(channel_capacity: usize, activity_capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            tx,
            activity: Arc::new(ActivityLog::new(activity_capacity)),
            clock,
        }
    }

    /// 发布事件到所有当前订阅者
    pub fn publish(&self, event: ObserverEvent) {
        let event_type = event.event_type();
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::trace!(event_type = %event_type, receivers, "Observer event published");
            }
            Err(_) => {
                // No observers connected
                tracing::trace!(event_type = %event_type, "Observer event dropped, no subscribers");
            }
        }
    }

    /// 订阅事件流 (不含快照)
    pub fn subscribe(&self) -> broadcast::Receiver<ObserverEvent> {
        self.tx.subscribe()
    }

    /// 观察者接入：先订阅，再生成全量快照
    ///
    /// 快照之后的任何变更都一定出现在返回的接收端中。
    pub fn connect<F>(&self, snapshot: F) -> (ObserverEvent, broadcast::Receiver<ObserverEvent>)
    where
        F: FnOnce() -> BTreeMap<String, TableSession>,
    {
        let rx = self.tx.subscribe();
        let initial = ObserverEvent::InitialTableStates(InitialTableStatesPayload {
            tables: snapshot(),
            recent_activity: self.activity.recent(),
            timestamp: self.clock.now_millis(),
        });
        tracing::debug!(observers = self.tx.receiver_count(), "Observer connected");
        (initial, rx)
    }

    /// 当前订阅者数量
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 最近活动 (最新在前)
    pub fn recent_activity(&self) -> Vec<ActivityEvent> {
        self.activity.recent()
    }

    /// 记录一条活动并发布
    pub fn activity(&self, level: ActivityLevel, message: impl Into<String>, table_id: Option<&str>) {
        let entry = ActivityEvent {
            timestamp: self.clock.now_millis(),
            message: message.into(),
            level,
            table_id: table_id.map(str::to_string),
        };
        self.activity.push(entry.clone());
        self.publish(ObserverEvent::Activity(ActivityPayload { entry }));
    }

    /// 桌台状态变更
    pub fn table_changed(&self, session: &TableSession) {
        let timestamp = self.clock.now_millis();
        self.publish(ObserverEvent::TableStateChanged(TableStateChangedPayload {
            table_id: session.table_id.clone(),
            state: session.clone(),
            timestamp,
        }));

        let (level, message) = match session.status {
            TableStatus::Ordered => (
                ActivityLevel::Success,
                format!("테이블 {}에 새로운 주문이 추가되었습니다.", session.table_id),
            ),
            TableStatus::Empty => (
                ActivityLevel::System,
                format!("테이블 {}이(가) 정리되었습니다.", session.table_id),
            ),
            _ => (
                ActivityLevel::Info,
                format!("테이블 {}의 상태가 업데이트되었습니다.", session.table_id),
            ),
        };
        self.activity(level, message, Some(&session.table_id));
    }

    /// 扫码尝试 (成功与失败都发布)
    pub fn qr_scan_attempt(&self, attempt: ScanAttempt) {
        let (level, message) = if attempt.success {
            (
                ActivityLevel::Success,
                format!("테이블 {} QR 접속 성공", attempt.table_id),
            )
        } else {
            (
                ActivityLevel::Warning,
                format!(
                    "테이블 {} QR 접속 실패: {}",
                    attempt.table_id,
                    attempt.reason.as_deref().unwrap_or("unknown")
                ),
            )
        };
        let table_id = attempt.table_id.clone();

        self.publish(ObserverEvent::QrScanAttempt(QrScanAttemptPayload {
            table_id: attempt.table_id,
            success: attempt.success,
            reason: attempt.reason,
            token_age_secs: attempt.token_age_secs,
            device: attempt.device,
            timestamp: self.clock.now_millis(),
        }));
        self.activity(level, message, Some(&table_id));
    }

    /// 二维码签发
    pub fn qr_generated(&self, token: &AccessToken) {
        let now = self.clock.now_millis();
        self.publish(ObserverEvent::QrGenerated(QrGeneratedPayload {
            table_id: token.table_id.clone(),
            token_id: token.token_id.clone(),
            expires_in_seconds: token.expires_in_secs_at(now),
            timestamp: now,
        }));
        self.activity(
            ActivityLevel::Info,
            format!("테이블 {} QR 코드가 생성되었습니다.", token.table_id),
            Some(&token.table_id),
        );
    }

    /// 对话消息
    pub fn new_message(
        &self,
        table_id: &str,
        message: &str,
        response: &str,
        action_performed: Option<String>,
    ) {
        self.publish(ObserverEvent::NewMessage(NewMessagePayload {
            table_id: table_id.to_string(),
            message: message.to_string(),
            response: response.to_string(),
            action_performed,
            timestamp: self.clock.now_millis(),
        }));
        self.activity(
            ActivityLevel::Info,
            format!("테이블 {}: {}", table_id, message),
            Some(table_id),
        );
    }
}

impl SessionObserver for EventBroadcaster {
    fn on_commit(&self, session: &TableSession) {
        self.table_changed(session);
    }
}
