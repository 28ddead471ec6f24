use std::time::Duration;

use crate::orchestrator::OrchestratorConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | BASE_URL | http://localhost:{HTTP_PORT} | 二维码中点餐页地址前缀 |
/// | TOKEN_TTL_SECS | 300 | 访问令牌有效期 |
/// | TOKEN_SWEEP_INTERVAL_SECS | 300 | 过期令牌清扫间隔 |
/// | ACTIVITY_LOG_CAPACITY | 50 | 最近活动条数 |
/// | EVENT_CHANNEL_CAPACITY | 1024 | 观察者广播通道容量 |
/// | ASSISTANT_URL | http://localhost:11434 | 文本生成后端地址 |
/// | ASSISTANT_MODEL | gemma3:27b-it-q4_K_M | 模型名 |
/// | ASSISTANT_TIMEOUT_MS | 15000 | 后端调用硬超时 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | - | 滚动日志目录 (可选) |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 TOKEN_TTL_SECS=600 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 点餐页地址前缀
    pub base_url: String,
    pub token_ttl_secs: u64,
    pub token_sweep_interval_secs: u64,
    pub activity_log_capacity: usize,
    pub event_channel_capacity: usize,

    // === 点餐助手 ===
    pub assistant_url: String,
    pub assistant_model: String,
    pub assistant_timeout_ms: u64,

    // === 日志 ===
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,

    /// 运行环境: development | production
    pub environment: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let http_port: u16 = env_or("HTTP_PORT", 3000);
        Self {
            http_port,
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", http_port)),
            token_ttl_secs: env_or("TOKEN_TTL_SECS", shared::models::DEFAULT_TOKEN_TTL_SECS),
            token_sweep_interval_secs: env_or("TOKEN_SWEEP_INTERVAL_SECS", 300),
            activity_log_capacity: env_or(
                "ACTIVITY_LOG_CAPACITY",
                crate::message::DEFAULT_ACTIVITY_CAPACITY,
            ),
            event_channel_capacity: env_or(
                "EVENT_CHANNEL_CAPACITY",
                crate::message::DEFAULT_CHANNEL_CAPACITY,
            ),
            assistant_url: std::env::var("ASSISTANT_URL")
                .unwrap_or_else(|_| "http://localhost:11434".into()),
            assistant_model: std::env::var("ASSISTANT_MODEL")
                .unwrap_or_else(|_| "gemma3:27b-it-q4_K_M".into()),
            assistant_timeout_ms: env_or("ASSISTANT_TIMEOUT_MS", 15000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// 清扫间隔 (至少 1 秒)
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.token_sweep_interval_secs.max(1))
    }

    pub fn assistant_timeout(&self) -> Duration {
        Duration::from_millis(self.assistant_timeout_ms)
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            base_url: self.base_url.clone(),
            token_ttl: self.token_ttl(),
            event_channel_capacity: self.event_channel_capacity,
            activity_log_capacity: self.activity_log_capacity,
        }
    }
}
