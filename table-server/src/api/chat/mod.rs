//! 点餐助手对话路由

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::core::{ServerState, SessionError};
use crate::orchestrator::{APOLOGY_MESSAGE, ChatReply};
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/chat", post(chat))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub table_id: Option<String>,
}

/// POST /api/chat - 一轮对话
///
/// 后端不可用时返回 503，`details.response` 带致歉文案供前端直接展示。
async fn chat(
    State(state): State<ServerState>,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let message = payload
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::required("message"))?;
    let table_id = payload
        .table_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::required("tableId"))?;

    match state.orchestrator().chat(&table_id, &message).await {
        Ok(reply) => Ok(Json(reply)),
        Err(err @ SessionError::ExternalServiceFailure(_)) => {
            Err(AppError::from(err).with_detail("response", APOLOGY_MESSAGE))
        }
        Err(err) => Err(err.into()),
    }
}
