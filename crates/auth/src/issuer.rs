//! HS256 token minting.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use thiserror::Error;
use tracing::instrument;

use cpfauth_core::UserRecord;

use crate::claims::{TokenClaims, TokenValidationError, TOKEN_TTL_SECS};

#[derive(Debug, Error)]
pub enum TokenError {
    /// The configured signing secret is empty. This is a configuration error
    /// and is never retried.
    #[error("signing secret is empty")]
    EmptySecret,

    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("failed to decode token: {0}")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token claims: {0}")]
    Claims(#[from] TokenValidationError),
}

/// A freshly minted token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact serialization (`header.payload.signature`, base64url).
    pub token: String,
    pub claims: TokenClaims,
}

impl IssuedToken {
    /// Seconds until expiry, as advertised to the caller.
    pub fn expires_in(&self) -> i64 {
        TOKEN_TTL_SECS
    }
}

/// Mints HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    /// Issue a token for `user`, valid for [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, user: &UserRecord) -> Result<IssuedToken, TokenError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token with an explicit issuance time.
    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    pub fn issue_at(&self, user: &UserRecord, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let claims = TokenClaims::for_user(user, now);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(TokenError::Sign)?;

        Ok(IssuedToken { token, claims })
    }
}

impl core::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .finish()
    }
}
