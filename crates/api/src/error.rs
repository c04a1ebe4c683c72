use thiserror::Error;
use tracing::{error, info};

use cpfauth_auth::TokenError;
use cpfauth_infra::UserStoreError;

use crate::envelope::ResponseEnvelope;

/// Every way a request can end without a token.
///
/// `Validation` and `NotFound` are expected outcomes with their own
/// envelopes; everything else collapses into the generic 500 and its detail
/// only reaches the logs.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("cpf is missing or blank")]
    Validation,

    #[error("no user with this cpf")]
    NotFound,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("user store failure: {0}")]
    Store(#[from] UserStoreError),

    #[error("token signing failure: {0}")]
    Signing(#[from] TokenError),
}

impl HandlerError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    /// Log the failure at the level it deserves and shape its envelope.
    pub fn into_envelope(self) -> ResponseEnvelope {
        match self {
            HandlerError::Validation => {
                info!("rejected: cpf missing or blank");
                ResponseEnvelope::validation_error()
            }
            HandlerError::NotFound => {
                info!("rejected: user not found");
                ResponseEnvelope::not_found()
            }
            other => {
                error!(error = %other, "request failed");
                ResponseEnvelope::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_outcomes_keep_their_status() {
        assert_eq!(HandlerError::Validation.into_envelope().status_code, 400);
        assert_eq!(HandlerError::NotFound.into_envelope().status_code, 404);
    }

    #[test]
    fn failures_collapse_to_generic_500() {
        let cases = [
            HandlerError::malformed("expected value at line 1 column 1"),
            HandlerError::Store(UserStoreError::Connect("connection refused".into())),
            HandlerError::Signing(TokenError::EmptySecret),
        ];
        for err in cases {
            let envelope = err.into_envelope();
            assert_eq!(envelope.status_code, 500);
            assert_eq!(envelope.body, r#"{"message":"Erro interno do servidor"}"#);
        }
    }
}
