//! 桌台 API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/table/qr/{table_id} | GET | 签发二维码令牌 |
//! | /order?table=&token= | GET | 扫码校验 (User-Agent 作为设备) |
//! | /api/table/status | GET | 全部桌台 |
//! | /api/table/status/{table_id} | GET | 单个桌台 |
//! | /api/table/{table_id}/cart | GET | 购物车 |
//! | /api/table/{table_id}/customers | POST | 设置就餐人数 |
//! | /api/table/served | POST | 上菜 |
//! | /api/table/clear | POST | 清台 |
//! | /api/table/system/info | GET | 系统概况 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/order", get(handler::scan))
        .nest("/api/table", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/qr/{table_id}", get(handler::issue_qr))
        .route("/status", get(handler::list_status))
        .route("/status/{table_id}", get(handler::get_status))
        .route("/system/info", get(handler::system_info))
        .route("/{table_id}/cart", get(handler::get_cart))
        .route("/{table_id}/customers", post(handler::set_customers))
        .route("/served", post(handler::mark_served))
        .route("/clear", post(handler::clear))
}
