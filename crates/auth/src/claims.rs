use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cpfauth_core::UserRecord;

/// Lifetime of every issued token, in seconds (two hours).
pub const TOKEN_TTL_SECS: i64 = 7200;

/// JWT claims carried by an issued token.
///
/// `iat`/`exp` are unix seconds as required by RFC 7519.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user's numeric id, stringified.
    pub sub: String,

    pub username: String,
    pub email: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp (`iat + TOKEN_TTL_SECS`).
    pub exp: i64,
}

impl TokenClaims {
    /// Build the claims for `user`, valid from `now` for [`TOKEN_TTL_SECS`].
    pub fn for_user(user: &UserRecord, now: DateTime<Utc>) -> Self {
        let issued_at = now.timestamp();
        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: issued_at,
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature verification happens in [`TokenVerifier`](crate::TokenVerifier);
/// this only looks at `iat`/`exp` against `now`.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
