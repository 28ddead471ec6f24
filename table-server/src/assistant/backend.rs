//! 文本生成后端
//!
//! 调用在任何核心锁之外进行，并带有硬超时：慢后端只会让本次对话失败，
//! 不会拖住编排层。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatRole};
use crate::core::SessionError;

/// 助手后端
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// 根据对话历史生成下一条助手回复
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, SessionError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama `/api/generate` 后端
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// 将对话历史压平为单个提示词
///
/// 系统提示词在前，其后是助手回复与用户消息，最后以 `Assistant:` 结尾。
pub fn build_prompt(messages: &[ChatMessage]) -> String {
    let collect = |role: ChatRole| {
        messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut prompt = messages
        .iter()
        .find(|m| m.role == ChatRole::System)
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let assistant = collect(ChatRole::Assistant);
    if !assistant.is_empty() {
        prompt.push_str(&format!("\n\nAssistant: {}", assistant));
    }
    let user = collect(ChatRole::User);
    if !user.is_empty() {
        prompt.push_str(&format!("\n\nUser: {}\n\nAssistant:", user));
    }
    prompt
}

#[async_trait]
impl AssistantBackend for OllamaBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, SessionError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(messages),
            stream: false,
            options: GenerateOptions {
                temperature: 0.7,
                top_p: 0.9,
            },
        };

        let resp = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "Assistant backend unreachable");
                SessionError::ExternalServiceFailure(format!("assistant request failed: {}", e))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Assistant backend returned error status");
            return Err(SessionError::ExternalServiceFailure(format!(
                "assistant returned {}: {}",
                status, text
            )));
        }

        let data: GenerateResponse = resp.json().await.map_err(|e| {
            SessionError::ExternalServiceFailure(format!("invalid assistant response: {}", e))
        })?;
        Ok(data.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_layout() {
        let messages = vec![
            ChatMessage::system("SYS"),
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi there"),
            ChatMessage::user("pasta please"),
        ];
        assert_eq!(
            build_prompt(&messages),
            "SYS\n\nAssistant: hi there\n\nUser: hello\npasta please\n\nAssistant:"
        );
    }

    #[test]
    fn test_build_prompt_system_only() {
        assert_eq!(build_prompt(&[ChatMessage::system("SYS")]), "SYS");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_external_failure() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let backend = OllamaBackend::new("http://127.0.0.1:9", "test", Duration::from_millis(500));
        let err = backend
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ExternalServiceFailure(_)));
    }

    #[tokio::test]
    async fn test_silent_backend_times_out() {
        // Accepts the connection but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let backend = OllamaBackend::new(format!("http://{}", addr), "test", Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = backend
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::ExternalServiceFailure(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
        server.abort();
    }
}
