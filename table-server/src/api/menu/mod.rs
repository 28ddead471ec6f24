//! 菜单目录路由

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use shared::models::MenuItem;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(list))
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    items: Vec<MenuItem>,
    categories: Vec<String>,
}

/// GET /api/menu - 全部菜品 (声明顺序) 与分类
async fn list(State(state): State<ServerState>) -> Json<MenuResponse> {
    let catalog = state.orchestrator().catalog();
    Json(MenuResponse {
        items: catalog.list().to_vec(),
        categories: catalog.categories().into_iter().map(str::to_string).collect(),
    })
}
