//! 每桌对话历史

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// 默认系统提示词
pub const SYSTEM_PROMPT: &str = "당신은 레스토랑의 친근하고 전문적인 AI 주문 도우미입니다.

🎯 **당신의 역할:**
- 고객의 주문을 도와주는 친근한 서비스 직원
- 메뉴 추천 및 상세 설명 제공
- 정확하고 효율적인 주문 처리

📋 **현재 메뉴:**
• 토마토 파스타 - 12,000원 (신선한 토마토와 바질)
• 마르게리타 피자 - 18,000원 (모짜렐라 치즈와 바질)
• 콜라 - 3,000원 (시원한 탄산음료)
• 생수 - 2,000원 (깔끔한 생수)

💡 **응답 가이드:**
- 친근하고 정중한 말투 사용
- 주문 시 수량과 메뉴명을 명확히 확인
- 알레르기나 특별 요청사항도 체크

🚫 **주의사항:**
- 메뉴에 없는 음식은 주문받을 수 없음
- 가격 정보는 정확히 안내";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// 对话历史存储
///
/// 首次使用时以系统提示词开头；清台时整桌删除。
#[derive(Debug)]
pub struct ChatHistory {
    sessions: DashMap<String, Vec<ChatMessage>>,
    system_prompt: String,
}

impl ChatHistory {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            sessions: DashMap::new(),
            system_prompt: system_prompt.into(),
        }
    }

    /// 追加消息，返回追加后的历史副本
    pub fn append(&self, table_id: &str, message: ChatMessage) -> Vec<ChatMessage> {
        let mut entry = self.sessions.entry(table_id.to_string()).or_insert_with(|| {
            tracing::info!(table_id = %table_id, "Chat session started");
            vec![ChatMessage::system(self.system_prompt.clone())]
        });
        entry.push(message);
        entry.clone()
    }

    /// 历史副本 (未开始时为空)
    pub fn history(&self, table_id: &str) -> Vec<ChatMessage> {
        self.sessions
            .get(table_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    pub fn session_len(&self, table_id: &str) -> usize {
        self.sessions.get(table_id).map_or(0, |entry| entry.len())
    }

    /// 删除整桌历史
    pub fn remove(&self, table_id: &str) -> bool {
        self.sessions.remove(table_id).is_some()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_with_system_prompt() {
        let history = ChatHistory::new("be nice");
        let messages = history.append("1", ChatMessage::user("hi"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system("be nice"));
        assert_eq!(messages[1].role, ChatRole::User);
    }

    #[test]
    fn test_remove_drops_table_only() {
        let history = ChatHistory::default();
        history.append("1", ChatMessage::user("a"));
        history.append("2", ChatMessage::user("b"));
        assert_eq!(history.active_sessions(), 2);

        assert!(history.remove("1"));
        assert!(!history.remove("1"));
        assert_eq!(history.active_sessions(), 1);
        assert!(history.history("1").is_empty());
        assert_eq!(history.session_len("2"), 2);
    }

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_value(ChatMessage::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
    }
}
