//! Unified error codes for the table ordering system
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Access errors (QR tokens)
//! - 7xxx: Table session errors (session, cart, menu)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Access ====================
    /// QR access token is unknown, expired, or bound to another table
    AccessTokenInvalid = 1101,

    // ==================== 7xxx: Table ====================
    /// Transition not allowed from the current table status
    InvalidTableTransition = 7002,
    /// Menu item is not in the catalog
    MenuItemNotFound = 7201,
    /// Cart has no lines
    CartEmpty = 7202,
    /// Quantity must be a positive integer
    InvalidQuantity = 7203,
    /// Customer count outside 0..=20
    InvalidCustomerCount = 7301,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Assistant backend unreachable or failed
    AssistantUnavailable = 9501,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::RequiredField => "Required field is missing",

            // Access
            ErrorCode::AccessTokenInvalid => "Access token is invalid or expired",

            // Table
            ErrorCode::InvalidTableTransition => "Operation not allowed in current table status",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::InvalidQuantity => "Quantity must be a positive integer",
            ErrorCode::InvalidCustomerCount => "Customer count must be between 0 and 20",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::AssistantUnavailable => "Assistant service is unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            7 => Ok(ErrorCode::RequiredField),

            // Access
            1101 => Ok(ErrorCode::AccessTokenInvalid),

            // Table
            7002 => Ok(ErrorCode::InvalidTableTransition),
            7201 => Ok(ErrorCode::MenuItemNotFound),
            7202 => Ok(ErrorCode::CartEmpty),
            7203 => Ok(ErrorCode::InvalidQuantity),
            7301 => Ok(ErrorCode::InvalidCustomerCount),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9501 => Ok(ErrorCode::AssistantUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
