//! `cpfauth-auth` — bearer token minting and verification.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns a
//! [`UserRecord`](cpfauth_core::UserRecord) into a signed HS256 token and back.

pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::{validate_claims, TokenClaims, TokenValidationError, TOKEN_TTL_SECS};
pub use issuer::{IssuedToken, TokenError, TokenIssuer};
pub use verifier::TokenVerifier;
