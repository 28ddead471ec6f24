//! Shared types for the table ordering system
//!
//! Domain models, observer event payloads, the unified error system and
//! time helpers used by table-server and its observers.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Observer event re-exports (for convenient access)
pub use message::{EventType, ObserverEvent};
