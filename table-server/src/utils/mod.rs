//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`Clock`] - 时间源抽象
//! - 日志初始化

pub mod clock;
pub mod logger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
