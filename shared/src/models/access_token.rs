//! QR Access Token Model

use serde::{Deserialize, Serialize};

/// Default access token lifetime (5 minutes)
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 300;

/// Short-lived credential binding a customer device to one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// Opaque random identifier (UUID v4)
    pub token_id: String,
    pub table_id: String,
    pub created_at: i64,
    /// `created_at + ttl`
    pub expires_at: i64,
}

impl AccessToken {
    /// Valid while `now <= expires_at`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }

    /// Whole seconds since issuance
    pub fn age_secs_at(&self, now: i64) -> u64 {
        u64::try_from((now - self.created_at) / 1000).unwrap_or(0)
    }

    /// Whole seconds left before expiry
    pub fn expires_in_secs_at(&self, now: i64) -> u64 {
        u64::try_from((self.expires_at - now) / 1000).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken {
            token_id: "t".into(),
            table_id: "1".into(),
            created_at: 1_000,
            expires_at: 301_000,
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let t = token();
        assert!(!t.is_expired_at(301_000));
        assert!(t.is_expired_at(301_001));
    }

    #[test]
    fn test_age_and_remaining() {
        let t = token();
        assert_eq!(t.age_secs_at(61_500), 60);
        assert_eq!(t.expires_in_secs_at(1_000), 300);
        assert_eq!(t.expires_in_secs_at(400_000), 0);
    }
}
