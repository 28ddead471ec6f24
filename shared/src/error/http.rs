//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::MenuItemNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::InvalidTableTransition => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::AccessTokenInvalid => StatusCode::UNAUTHORIZED,

            // 422 Unprocessable (well-formed but rejected by business rules)
            Self::CartEmpty => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::AssistantUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
