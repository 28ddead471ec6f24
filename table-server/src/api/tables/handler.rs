//! 桌台 API Handlers

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::HeaderMap;
use http::header::USER_AGENT;
use serde::Deserialize;
use shared::models::TableSession;

use crate::core::ServerState;
use crate::orchestrator::{AccessGrant, CartView, ClearOutcome, IssuedToken, SystemInfo};
use crate::utils::{AppError, AppResult};

/// 店员操作请求体 `{ "tableId": "..." }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    pub table_id: Option<String>,
}

impl TableRequest {
    pub fn require_table(self) -> AppResult<String> {
        self.table_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::required("tableId"))
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    pub table: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerCountRequest {
    pub count: Option<i64>,
}

/// GET /api/table/qr/{table_id} - 签发二维码令牌
pub async fn issue_qr(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> Json<IssuedToken> {
    Json(state.orchestrator().issue_token(&table_id))
}

/// GET /order?table=&token= - 扫码校验
pub async fn scan(
    State(state): State<ServerState>,
    Query(query): Query<ScanQuery>,
    headers: HeaderMap,
) -> AppResult<Json<AccessGrant>> {
    let table_id = query.table.ok_or_else(|| AppError::required("table"))?;
    let token = query.token.ok_or_else(|| AppError::required("token"))?;
    let device = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    let grant = state
        .orchestrator()
        .validate_access(&token, &table_id, device)?;
    Ok(Json(grant))
}

/// GET /api/table/status - 全部桌台
pub async fn list_status(
    State(state): State<ServerState>,
) -> Json<BTreeMap<String, TableSession>> {
    Json(state.orchestrator().all_tables())
}

/// GET /api/table/status/{table_id} - 单个桌台 (未出现过的桌台返回空闲状态)
pub async fn get_status(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> Json<TableSession> {
    Json(state.orchestrator().table_status(&table_id))
}

/// GET /api/table/{table_id}/cart
pub async fn get_cart(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
) -> Json<CartView> {
    Json(state.orchestrator().cart(&table_id))
}

/// POST /api/table/{table_id}/customers - 设置就餐人数
pub async fn set_customers(
    State(state): State<ServerState>,
    Path(table_id): Path<String>,
    Json(payload): Json<CustomerCountRequest>,
) -> AppResult<Json<TableSession>> {
    let count = payload.count.ok_or_else(|| AppError::required("count"))?;
    let session = state.orchestrator().set_customer_count(&table_id, count)?;
    Ok(Json(session))
}

/// POST /api/table/served - 上菜
pub async fn mark_served(
    State(state): State<ServerState>,
    Json(payload): Json<TableRequest>,
) -> AppResult<Json<TableSession>> {
    let table_id = payload.require_table()?;
    let session = state.orchestrator().mark_served(&table_id)?;
    Ok(Json(session))
}

/// POST /api/table/clear - 清台
pub async fn clear(
    State(state): State<ServerState>,
    Json(payload): Json<TableRequest>,
) -> AppResult<Json<ClearOutcome>> {
    let table_id = payload.require_table()?;
    let outcome = state.orchestrator().clear_table(&table_id)?;
    Ok(Json(outcome))
}

/// GET /api/table/system/info
pub async fn system_info(State(state): State<ServerState>) -> Json<SystemInfo> {
    Json(state.orchestrator().system_info())
}
