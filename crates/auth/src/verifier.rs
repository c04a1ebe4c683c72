//! HS256 token verification (the inverse of [`TokenIssuer`](crate::TokenIssuer)).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::claims::{validate_claims, TokenClaims};
use crate::issuer::TokenError;

/// Verifies tokens minted with the same shared secret.
///
/// Verification is side-effect free: the same token and `now` always yield the
/// same result.
#[derive(Clone)]
pub struct TokenVerifier {
    secret: Vec<u8>,
}

impl TokenVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        // Only HS256 is accepted; the time window is checked against `now`
        // below instead of the library clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(TokenError::Decode)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl core::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("secret", &"<redacted>")
            .finish()
    }
}
