//! 桌台会话
//!
//! - [`SessionRegistry`] - 桌台 → 会话的权威映射，每桌原子更新
//! - [`SessionUpdate`] - 字段级合并更新
//! - [`cart`] - 购物车账本操作

pub mod cart;
mod registry;
mod update;

pub use cart::CartError;
pub use registry::{SessionObserver, SessionRegistry};
pub use update::SessionUpdate;
