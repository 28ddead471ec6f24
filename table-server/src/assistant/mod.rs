//! 点餐助手边界
//!
//! - [`AssistantBackend`] - 文本生成 (默认 Ollama)
//! - [`IntentParser`] - 文本 → 结构化意图
//! - [`ChatHistory`] - 每桌对话历史
//! - [`MenuCatalog`] - 已知菜品

mod backend;
mod catalog;
mod history;
mod intent;

pub use backend::{AssistantBackend, OllamaBackend, build_prompt};
pub use catalog::{MenuCatalog, format_won};
pub use history::{ChatHistory, ChatMessage, ChatRole, SYSTEM_PROMPT};
pub use intent::{Intent, IntentParser, KeywordIntentParser};
