//! QR 访问令牌
//!
//! - [`TokenStore`] - 签发 / 校验 / 撤销 / 清扫
//! - [`TokenJanitor`] - 定时清扫过期令牌

mod janitor;
mod store;

pub use janitor::TokenJanitor;
pub use store::{TokenCheck, TokenStore};
