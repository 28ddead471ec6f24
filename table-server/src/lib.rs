//! Table Server - 扫码点餐桌台会话服务
//!
//! # 架构概述
//!
//! - **令牌** (`tokens`): 绑定桌台、限时有效的二维码访问令牌
//! - **会话** (`sessions`): 每桌状态、购物车、总价
//! - **消息** (`message`): 观察者事件广播与最近活动
//! - **编排** (`orchestrator`): 扫码 / 对话 / 店员操作 → 状态转换
//! - **助手** (`assistant`): 文本生成后端、意图解析、菜单目录
//! - **HTTP API** (`api`): 薄路由层 + SSE 事件流
//!
//! # 模块结构
//!
//! ```text
//! table-server/src/
//! ├── core/          # 配置、状态、后台任务、错误
//! ├── tokens/        # TokenStore + Janitor
//! ├── sessions/      # SessionRegistry + 购物车
//! ├── message/       # EventBroadcaster + ActivityLog
//! ├── orchestrator/  # SessionOrchestrator
//! ├── assistant/     # AssistantBackend, IntentParser, ChatHistory
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 时钟、日志
//! ```

pub mod api;
pub mod assistant;
pub mod core;
pub mod message;
pub mod orchestrator;
pub mod sessions;
pub mod tokens;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, SessionError, SessionResult};
pub use orchestrator::{OrchestratorConfig, SessionOrchestrator};
pub use utils::{AppError, AppResult, Clock, ManualClock, SystemClock};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 按配置初始化日志 (控制台 + 可选滚动文件)
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
  _____     _     _
 |_   _|_ _| |__ | | ___
   | |/ _` | '_ \| |/ _ \
   | | (_| | |_) | |  __/
   |_|\__,_|_.__/|_|\___|
    "#
    );
}
