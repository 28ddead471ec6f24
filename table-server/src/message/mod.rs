//! 观察者消息
//!
//! - [`EventBroadcaster`] - 状态变更扇出与接入快照
//! - [`ActivityLog`] - 最近活动缓冲区

mod activity_log;
mod broadcaster;

pub use activity_log::{ActivityLog, DEFAULT_ACTIVITY_CAPACITY};
pub use broadcaster::{DEFAULT_CHANNEL_CAPACITY, EventBroadcaster, ScanAttempt};
