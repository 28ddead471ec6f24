//! 最近活动日志 (有界，最新在前)

use std::collections::VecDeque;

use parking_lot::Mutex;
use shared::models::ActivityEvent;

/// 默认保留条数
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 50;

#[derive(Debug)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEvent>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// 追加一条活动，超出容量时丢弃最旧的
    pub fn push(&self, entry: ActivityEvent) {
        let mut entries = self.entries.lock();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// 最近活动副本 (最新在前)
    pub fn recent(&self) -> Vec<ActivityEvent> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ActivityLevel;

    fn entry(n: i64) -> ActivityEvent {
        ActivityEvent {
            timestamp: n,
            message: format!("event {n}"),
            level: ActivityLevel::Info,
            table_id: None,
        }
    }

    #[test]
    fn test_most_recent_first() {
        let log = ActivityLog::new(10);
        log.push(entry(1));
        log.push(entry(2));
        let recent = log.recent();
        assert_eq!(recent[0].timestamp, 2);
        assert_eq!(recent[1].timestamp, 1);
    }

    #[test]
    fn test_bounded_capacity() {
        let log = ActivityLog::new(3);
        for n in 0..10 {
            log.push(entry(n));
        }
        let stamps: Vec<i64> = log.recent().iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![9, 8, 7]);
    }
}
