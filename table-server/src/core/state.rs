use std::sync::Arc;

use crate::assistant::{KeywordIntentParser, OllamaBackend};
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::orchestrator::SessionOrchestrator;
use crate::tokens::TokenJanitor;
use crate::utils::SystemClock;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价克隆，可以直接作为 axum 的 State 使用。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 服务器配置 |
/// | orchestrator | 会话编排器 (令牌、会话、广播、助手) |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub orchestrator: SessionOrchestrator,
}

impl ServerState {
    /// 使用现成的编排器创建状态 (测试时注入 ManualClock / 脚本后端)
    pub fn new(config: Config, orchestrator: SessionOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator,
        }
    }

    /// 按配置初始化：系统时钟、Ollama 后端、关键词意图解析器
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        let backend = OllamaBackend::new(
            config.assistant_url.clone(),
            config.assistant_model.clone(),
            config.assistant_timeout(),
        );
        let parser = KeywordIntentParser::new()?;

        let orchestrator = SessionOrchestrator::new(
            config.orchestrator(),
            Arc::new(SystemClock),
            Arc::new(backend),
            Arc::new(parser),
        );

        tracing::info!(
            base_url = %config.base_url,
            token_ttl_secs = config.token_ttl_secs,
            assistant = %config.assistant_url,
            model = %config.assistant_model,
            "Server state initialized"
        );
        Ok(Self::new(config.clone(), orchestrator))
    }

    /// 启动后台任务
    ///
    /// - 过期令牌清扫 (Periodic)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let janitor = TokenJanitor::new(
            self.orchestrator.tokens().clone(),
            self.config.sweep_interval(),
        );
        tasks.spawn(
            "token_janitor",
            TaskKind::Periodic,
            janitor.run(tasks.shutdown_token()),
        );

        tasks.log_summary();
        tasks
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.orchestrator
    }
}
