//! 会话核心错误
//!
//! 所有错误都在编排层被转换为类型化结果，不会以未处理故障的形式向外传播。
//! 只有内部不变量被破坏 ([`SessionError::Internal`]) 才代表核心缺陷。

use shared::error::{AppError, ErrorCode};
use shared::models::TableStatus;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Access token is invalid or expired")]
    InvalidOrExpiredToken,

    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(String),

    #[error("Cannot complete an order with an empty cart")]
    EmptyCartCompletion,

    #[error("Customer count must be between 0 and 20, got {0}")]
    InvalidCustomerCount(i64),

    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("Cannot {action} while table is {from}")]
    InvalidTransition {
        from: TableStatus,
        action: &'static str,
    },

    #[error("External service failure: {0}")]
    ExternalServiceFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// 会话核心的 Result 类型别名
pub type SessionResult<T> = std::result::Result<T, SessionError>;

impl From<crate::sessions::CartError> for SessionError {
    fn from(err: crate::sessions::CartError) -> Self {
        match err {
            crate::sessions::CartError::InvalidQuantity(q) => SessionError::InvalidQuantity(q),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let code = match &err {
            SessionError::InvalidOrExpiredToken => ErrorCode::AccessTokenInvalid,
            SessionError::UnknownMenuItem(_) => ErrorCode::MenuItemNotFound,
            SessionError::EmptyCartCompletion => ErrorCode::CartEmpty,
            SessionError::InvalidCustomerCount(_) => ErrorCode::InvalidCustomerCount,
            SessionError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            SessionError::InvalidTransition { .. } => ErrorCode::InvalidTableTransition,
            SessionError::ExternalServiceFailure(_) => ErrorCode::AssistantUnavailable,
            SessionError::Internal(msg) => {
                tracing::error!(error = %msg, "Session invariant violated");
                ErrorCode::InternalError
            }
        };
        let app_err = AppError::with_message(code, err.to_string());
        match err {
            SessionError::UnknownMenuItem(id) => app_err.with_detail("menu_id", id),
            SessionError::InvalidCustomerCount(count) => app_err.with_detail("count", count),
            SessionError::InvalidTransition { from, .. } => {
                app_err.with_detail("status", from.as_str())
            }
            _ => app_err,
        }
    }
}
