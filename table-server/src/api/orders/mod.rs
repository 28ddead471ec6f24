//! 订单路由

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::core::ServerState;
use crate::orchestrator::OrderReceipt;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/order/complete", post(complete))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOrderRequest {
    pub table_id: Option<String>,
}

/// POST /api/order/complete - 完成订单 (送往厨房)
async fn complete(
    State(state): State<ServerState>,
    Json(payload): Json<CompleteOrderRequest>,
) -> AppResult<Json<OrderReceipt>> {
    let table_id = payload
        .table_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::required("tableId"))?;
    let receipt = state.orchestrator().complete_order(&table_id)?;
    Ok(Json(receipt))
}
