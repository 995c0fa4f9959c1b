//! Admin token codec
//!
//! Tokens are base64-encoded JSON `{admin, exp}` with a 24 hour lifetime,
//! matching the wire contract of the admin auth endpoint. They are not
//! cryptographically signed; validity is purely an expiry comparison.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::ADMIN_TOKEN_TTL_MS;
use crate::error::{CoreError, CoreResult};

/// Short-lived opaque admin token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminToken {
    /// Always true for issued tokens
    pub admin: bool,
    /// Expiry as epoch milliseconds
    pub exp: i64,
}

impl AdminToken {
    /// Issue a token valid for the standard 24 hour lifetime
    pub fn issue() -> Self {
        Self::issue_with_ttl(ADMIN_TOKEN_TTL_MS)
    }

    /// Issue a token with an explicit lifetime in milliseconds
    pub fn issue_with_ttl(ttl_ms: i64) -> Self {
        Self {
            admin: true,
            exp: Utc::now().timestamp_millis() + ttl_ms,
        }
    }

    /// Encode to the opaque wire form
    pub fn encode(&self) -> String {
        // serializing a two-field struct cannot fail
        let json = serde_json::to_string(self).unwrap_or_default();
        BASE64.encode(json)
    }

    /// Decode from the opaque wire form
    pub fn decode(token: &str) -> CoreResult<Self> {
        let bytes = BASE64
            .decode(token.trim())
            .map_err(|e| CoreError::InvalidToken(format!("not base64: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::InvalidToken(format!("not a token payload: {}", e)))
    }

    /// Whether the token grants admin access right now
    pub fn is_valid(&self) -> bool {
        self.admin && self.exp > Utc::now().timestamp_millis()
    }
}
