//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台二维码、状态、购物车、店员操作
//! - [`orders`] - 下单
//! - [`chat`] - 点餐助手对话
//! - [`menu`] - 菜单目录
//! - [`events`] - 观察者事件流 (SSE)

pub mod chat;
pub mod events;
pub mod health;
pub mod menu;
pub mod orders;
pub mod tables;

use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

/// 所有业务路由 (未绑定状态)
pub fn routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(chat::router())
        .merge(menu::router())
        .merge(events::router())
}

/// 绑定状态并挂载中间件，得到可直接 serve 的 Router
pub fn build_app(state: ServerState) -> Router {
    routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(middleware::from_fn(log_request)),
    )
}
