//! TokenStore - QR 访问令牌的签发、校验与过期
//!
//! 令牌以 token_id 为键存储在 DashMap 中，所有操作对同一令牌原子执行。
//! 校验是过期的权威判定点：即使清扫任务尚未运行，过期令牌也不会校验通过，
//! 并且在第一次被发现过期时立即删除。

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::models::AccessToken;

use crate::utils::Clock;

/// 校验结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenCheck {
    /// 令牌有效，返回绑定的桌台和已存活秒数
    Valid { table_id: String, age_secs: u64 },
    /// 令牌不存在或已过期
    Invalid,
}

/// 访问令牌存储
#[derive(Debug, Clone)]
pub struct TokenStore {
    tokens: Arc<DashMap<String, AccessToken>>,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// 令牌有效期 (秒)
    pub fn ttl_secs(&self) -> u64 {
        u64::try_from(self.ttl_millis / 1000).unwrap_or(0)
    }

    /// 为桌台签发新令牌
    ///
    /// 不限制同一桌台同时存在的有效令牌数量 (多设备/重复扫码)。
    pub fn issue(&self, table_id: &str) -> AccessToken {
        let now = self.clock.now_millis();
        let token = AccessToken {
            token_id: uuid::Uuid::new_v4().to_string(),
            table_id: table_id.to_string(),
            created_at: now,
            expires_at: now.saturating_add(self.ttl_millis),
        };
        self.tokens.insert(token.token_id.clone(), token.clone());
        tracing::debug!(table_id = %table_id, token = %token.token_id, "Access token issued");
        token
    }

    /// 校验令牌
    ///
    /// 过期令牌在此处被删除，返回 `Invalid`。
    pub fn validate(&self, token_id: &str) -> TokenCheck {
        let now = self.clock.now_millis();
        match self.tokens.entry(token_id.to_string()) {
            Entry::Vacant(_) => TokenCheck::Invalid,
            Entry::Occupied(entry) => {
                if entry.get().is_expired_at(now) {
                    let token = entry.remove();
                    tracing::debug!(
                        table_id = %token.table_id,
                        token = %token.token_id,
                        "Expired access token removed on validation"
                    );
                    TokenCheck::Invalid
                } else {
                    let token = entry.get();
                    TokenCheck::Valid {
                        table_id: token.table_id.clone(),
                        age_secs: token.age_secs_at(now),
                    }
                }
            }
        }
    }

    /// 撤销桌台的所有令牌 (清台时调用)，返回撤销数量
    pub fn revoke_all_for_table(&self, table_id: &str) -> usize {
        let mut revoked = 0;
        self.tokens.retain(|_, token| {
            if token.table_id == table_id {
                revoked += 1;
                false
            } else {
                true
            }
        });
        revoked
    }

    /// 清除所有已过期令牌，返回清除数量
    ///
    /// 逐个分片加锁，不会阻塞其他分片上的校验。
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let mut removed = 0;
        self.tokens.retain(|_, token| {
            if token.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// 当前存储的令牌数量 (可能包含尚未清除的过期令牌)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
