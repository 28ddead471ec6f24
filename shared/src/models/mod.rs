//! Data models
//!
//! Shared between table-server and its observers (dashboard, kitchen,
//! customer devices). All instants are Unix epoch milliseconds (`i64`),
//! all prices are whole currency units (`i64`).

pub mod access_token;
pub mod activity;
pub mod menu;
pub mod table_session;

// Re-exports
pub use access_token::*;
pub use activity::*;
pub use menu::*;
pub use table_session::*;
