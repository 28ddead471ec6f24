//! SessionRegistry - 桌台会话的权威存储
//!
//! # 并发模型
//!
//! ```text
//! DashMap<table_id, Arc<Mutex<TableSession>>>
//!        │                  │
//!        │                  └── 每桌一把锁：同桌的更新串行执行
//!        └── 分片锁只在查找/插入槽位时短暂持有
//! ```
//!
//! 不同桌台的更新互不阻塞。每次提交后，在仍持有该桌锁的情况下通知
//! [`SessionObserver`]，因此同一桌台的事件顺序与提交顺序一致。
//! 对外只返回快照副本，从不暴露内部引用。

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use shared::models::{TableSession, TableStatus};

use super::SessionUpdate;
use super::cart;
use crate::core::{SessionError, SessionResult};
use crate::utils::Clock;

/// 会话提交观察者
///
/// 在持有桌台锁时同步调用，实现必须非阻塞。
pub trait SessionObserver: Send + Sync {
    fn on_commit(&self, session: &TableSession);
}

/// 桌台会话注册表
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, Arc<Mutex<TableSession>>>>,
    clock: Arc<dyn Clock>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("tables", &self.sessions.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl SessionRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            clock,
            observer: None,
        }
    }

    /// 设置提交观察者 (通常为事件广播器)
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// 获取桌台快照，从未出现过的桌台返回默认 `empty` 会话
    pub fn get(&self, table_id: &str) -> TableSession {
        // Clone the slot out so the shard lock is released before locking the table
        let slot = self.sessions.get(table_id).map(|entry| Arc::clone(entry.value()));
        match slot {
            Some(slot) => slot.lock().clone(),
            None => TableSession::new(table_id),
        }
    }

    /// 字段级合并更新
    ///
    /// 重新计算总额，写入 `last_activity`，返回新快照。
    pub fn merge(&self, table_id: &str, update: SessionUpdate) -> SessionResult<TableSession> {
        self.update(table_id, |session| {
            update.apply_to(session);
            Ok(())
        })
        .map(|(snapshot, ())| snapshot)
    }

    /// 原子读-改-写
    ///
    /// 闭包在草稿副本上执行；返回错误时不提交任何修改。
    /// 所有高层状态转换 (开台、加菜、下单、上菜、清台) 都经由此处。
    pub fn update<T, F>(&self, table_id: &str, mutate: F) -> SessionResult<(TableSession, T)>
    where
        F: FnOnce(&mut TableSession) -> SessionResult<T>,
    {
        let slot = self.slot(table_id);
        let mut current = slot.lock();

        let mut draft = current.clone();
        let output = mutate(&mut draft)?;

        cart::recalculate_total(&mut draft);
        verify_invariants(&draft)?;

        let now = self.clock.now_millis();
        draft.last_activity = Some(current.last_activity.map_or(now, |prev| prev.max(now)));

        *current = draft;
        if let Some(observer) = &self.observer {
            observer.on_commit(&current);
        }

        tracing::debug!(table_id = %table_id, status = %current.status, "Table session committed");
        Ok((current.clone(), output))
    }

    /// 所有桌台的快照副本
    pub fn list_all(&self) -> BTreeMap<String, TableSession> {
        let slots: Vec<(String, Arc<Mutex<TableSession>>)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        slots
            .into_iter()
            .map(|(id, slot)| {
                let snapshot = slot.lock().clone();
                (id, snapshot)
            })
            .collect()
    }

    /// 已出现过的桌台数量
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn slot(&self, table_id: &str) -> Arc<Mutex<TableSession>> {
        if let Some(entry) = self.sessions.get(table_id) {
            return Arc::clone(entry.value());
        }
        let entry = self
            .sessions
            .entry(table_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TableSession::new(table_id))));
        Arc::clone(entry.value())
    }
}

/// 提交前校验不变量；失败代表核心缺陷而非错误输入
fn verify_invariants(session: &TableSession) -> SessionResult<()> {
    if session.total_amount < 0 {
        let msg = format!(
            "table {} total amount is negative: {}",
            session.table_id, session.total_amount
        );
        tracing::error!(table_id = %session.table_id, total = session.total_amount, "Negative cart total");
        return Err(SessionError::Internal(msg));
    }
    if session.status == TableStatus::Empty && !session.cart.is_empty() {
        let msg = format!("table {} is empty but cart has lines", session.table_id);
        tracing::error!(table_id = %session.table_id, lines = session.cart.len(), "Empty table with cart lines");
        return Err(SessionError::Internal(msg));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualClock;
    use shared::models::CartLine;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry() -> (SessionRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        (SessionRegistry::new(clock.clone()), clock)
    }

    fn line(id: &str, price: i64, quantity: u32) -> CartLine {
        CartLine {
            menu_id: id.to_string(),
            name: id.to_string(),
            price,
            quantity,
            category: "main".to_string(),
        }
    }

    #[test]
    fn test_get_unseen_table_returns_default() {
        let (registry, _) = registry();
        let session = registry.get("42");
        assert_eq!(session.table_id, "42");
        assert_eq!(session.status, TableStatus::Empty);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_merge_recomputes_total_and_stamps_activity() {
        let (registry, clock) = registry();
        clock.set(5_000);

        let session = registry
            .merge(
                "1",
                SessionUpdate::new()
                    .status(TableStatus::Ordering)
                    .cart(vec![line("a", 100, 2), line("b", 50, 1)]),
            )
            .unwrap();

        assert_eq!(session.total_amount, 250);
        assert_eq!(session.last_activity, Some(5_000));
        assert_eq!(registry.get("1"), session);
    }

    #[test]
    fn test_last_activity_never_decreases() {
        let (registry, clock) = registry();
        clock.set(10_000);
        registry.merge("1", SessionUpdate::new().customers(2)).unwrap();

        clock.set(9_000);
        let session = registry.merge("1", SessionUpdate::new().customers(3)).unwrap();
        assert_eq!(session.last_activity, Some(10_000));
    }

    #[test]
    fn test_failed_update_does_not_commit() {
        let (registry, _) = registry();
        registry.merge("1", SessionUpdate::new().customers(2)).unwrap();
        let before = registry.get("1");

        let result: SessionResult<(TableSession, ())> = registry.update("1", |session| {
            session.customers = 9;
            Err(SessionError::EmptyCartCompletion)
        });

        assert_eq!(result.unwrap_err(), SessionError::EmptyCartCompletion);
        assert_eq!(registry.get("1"), before);
    }

    #[test]
    fn test_invariant_violation_is_rejected() {
        let (registry, _) = registry();
        let result = registry.merge(
            "1",
            SessionUpdate::new()
                .status(TableStatus::Empty)
                .cart(vec![line("a", 100, 1)]),
        );
        assert!(matches!(result, Err(SessionError::Internal(_))));
        assert!(registry.get("1").cart.is_empty());
    }

    #[test]
    fn test_list_all_is_a_copy() {
        let (registry, _) = registry();
        registry.merge("3", SessionUpdate::new().status(TableStatus::Occupied)).unwrap();
        registry.merge("5", SessionUpdate::new().customers(4)).unwrap();

        let mut all = registry.list_all();
        assert_eq!(all.len(), 2);
        all.get_mut("3").unwrap().customers = 20;
        assert_eq!(registry.get("3").customers, 0);
    }

    #[test]
    fn test_observer_sees_every_commit_in_order() {
        struct Recorder(Mutex<Vec<u8>>);
        impl SessionObserver for Recorder {
            fn on_commit(&self, session: &TableSession) {
                self.0.lock().push(session.customers);
            }
        }

        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let clock = Arc::new(ManualClock::new(0));
        let registry = SessionRegistry::new(clock).with_observer(recorder.clone());

        for count in 1..=5 {
            registry.merge("1", SessionUpdate::new().customers(count)).unwrap();
        }
        assert_eq!(*recorder.0.lock(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_concurrent_updates_on_different_tables_do_not_interfere() {
        let (registry, _) = registry();
        registry.merge("5", SessionUpdate::new().customers(4)).unwrap();
        let table5_before = registry.get("5");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        registry
                            .update("3", |session| {
                                session.status = TableStatus::Ordering;
                                match session.cart.first_mut() {
                                    Some(l) => l.quantity += 1,
                                    None => session.cart.push(line("pasta_01", 12000, 1)),
                                }
                                Ok(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let table3 = registry.get("3");
        // No lost updates on the contended table
        assert_eq!(table3.cart[0].quantity, 800);
        assert_eq!(table3.total_amount, 800 * 12000);
        assert_eq!(registry.get("5"), table5_before);
    }

    #[test]
    fn test_observer_called_once_per_commit_under_contention() {
        struct Counter(AtomicUsize);
        impl SessionObserver for Counter {
            fn on_commit(&self, _session: &TableSession) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let registry = SessionRegistry::new(Arc::new(ManualClock::new(0)))
            .with_observer(counter.clone());

        let handles: Vec<_> = ["1", "2", "3", "4"]
            .into_iter()
            .map(|table| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for count in 0..50u8 {
                        registry.merge(table, SessionUpdate::new().customers(count % 21)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.0.load(Ordering::SeqCst), 200);
        assert_eq!(registry.len(), 4);
    }
}
