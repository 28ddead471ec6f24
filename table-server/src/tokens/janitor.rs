//! TokenJanitor - 过期令牌定时清扫
//!
//! 仅用于回收内存：令牌校验的正确性不依赖清扫时机。

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::TokenStore;

/// 过期令牌清扫任务
#[derive(Debug, Clone)]
pub struct TokenJanitor {
    store: TokenStore,
    interval: Duration,
}

impl TokenJanitor {
    pub fn new(store: TokenStore, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// 执行一次清扫
    pub fn sweep_once(&self) -> usize {
        let removed = self.store.sweep_expired();
        if removed > 0 {
            tracing::info!(count = removed, "Expired access tokens swept");
        }
        removed
    }

    /// 运行清扫循环，直到 shutdown 令牌被取消
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Token janitor started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Token janitor stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep_once();
                }
            }
        }
    }
}
