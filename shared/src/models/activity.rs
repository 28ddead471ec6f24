//! Activity Log Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Activity severity / category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Info,
    Success,
    Warning,
    System,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Transient activity entry, kept only in the bounded recent-history buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub timestamp: i64,
    pub message: String,
    pub level: ActivityLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}
