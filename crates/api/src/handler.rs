//! The lookup-then-issue flow.

use std::sync::Arc;

use tracing::{info, instrument};

use cpfauth_auth::{IssuedToken, TokenIssuer};
use cpfauth_infra::UserStore;

use crate::context::InvocationContext;
use crate::envelope::ResponseEnvelope;
use crate::error::HandlerError;
use crate::event::{InboundEvent, RequestBody};

/// Maps one inbound event to exactly one response envelope.
///
/// Never fails outward: every error path ends in an envelope.
#[derive(Clone)]
pub struct AuthHandler {
    store: Arc<dyn UserStore>,
    issuer: TokenIssuer,
}

impl AuthHandler {
    pub fn new(store: Arc<dyn UserStore>, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    #[instrument(
        name = "auth_request",
        skip_all,
        fields(request_id = %ctx.request_id())
    )]
    pub async fn handle(&self, event: &InboundEvent, ctx: &InvocationContext) -> ResponseEnvelope {
        info!(
            body_kind = event.body_kind(),
            extra_fields = event.extra.len(),
            "received event"
        );

        match self.issue_for(event).await {
            Ok(issued) => {
                info!(user_id = %issued.claims.sub, "token issued");
                ResponseEnvelope::success(&issued.token, issued.expires_in())
            }
            Err(err) => err.into_envelope(),
        }
    }

    /// Entry point for frameworks that hand over the event as raw JSON text.
    ///
    /// An unparseable event is treated like any other malformed input.
    pub async fn handle_raw(&self, raw: &str, ctx: &InvocationContext) -> ResponseEnvelope {
        match serde_json::from_str::<InboundEvent>(raw) {
            Ok(event) => self.handle(&event, ctx).await,
            Err(e) => tracing::info_span!("auth_request", request_id = %ctx.request_id())
                .in_scope(|| {
                    HandlerError::malformed(format!("event is not a JSON object: {e}")).into_envelope()
                }),
        }
    }

    async fn issue_for(&self, event: &InboundEvent) -> Result<IssuedToken, HandlerError> {
        let body = RequestBody::from_event(event)?;
        let cpf = body.cpf()?;

        let user = self
            .store
            .find_by_cpf(&cpf)
            .await?
            .ok_or(HandlerError::NotFound)?;

        Ok(self.issuer.issue(&user)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cpfauth_auth::{TokenVerifier, TOKEN_TTL_SECS};
    use cpfauth_core::UserRecord;
    use cpfauth_infra::{CachedUserStore, InMemoryConnector};
    use serde_json::{json, Value};

    const SECRET: &str = "handler-test-secret";
    const ALICE_CPF: &str = "12345678901";

    fn setup_with_secret(secret: &str) -> (AuthHandler, InMemoryConnector) {
        let connector = InMemoryConnector::new();
        connector.insert(ALICE_CPF, UserRecord::new(42, "alice", "a@x.com"));
        let store = Arc::new(CachedUserStore::new(connector.clone()));
        (AuthHandler::new(store, TokenIssuer::new(secret)), connector)
    }

    fn setup() -> (AuthHandler, InMemoryConnector) {
        setup_with_secret(SECRET)
    }

    fn event(value: Value) -> InboundEvent {
        serde_json::from_value(value).unwrap()
    }

    fn cpf_event(cpf: &str) -> InboundEvent {
        event(json!({"body": json!({"cpf": cpf}).to_string()}))
    }

    fn body(envelope: &ResponseEnvelope) -> Value {
        serde_json::from_str(&envelope.body).unwrap()
    }

    async fn run(handler: &AuthHandler, ev: InboundEvent) -> ResponseEnvelope {
        handler.handle(&ev, &InvocationContext::new()).await
    }

    #[tokio::test]
    async fn missing_or_blank_cpf_is_400() {
        let (handler, connector) = setup();
        for ev in [
            event(json!({})),
            event(json!({"body": "{}"})),
            event(json!({"body": {"other": "x"}})),
            event(json!({"body": {"cpf": null}})),
            cpf_event(""),
            cpf_event("   "),
        ] {
            let envelope = run(&handler, ev).await;
            assert_eq!(envelope.status_code, 400);
            assert_eq!(body(&envelope), json!({"message": "CPF é obrigatório"}));
        }
        // Validation happens before the store is touched.
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test]
    async fn unknown_cpf_is_404() {
        let (handler, _) = setup();
        let envelope = run(&handler, cpf_event("00000000000")).await;
        assert_eq!(envelope.status_code, 404);
        assert_eq!(body(&envelope), json!({"message": "Usuário não encontrado"}));
    }

    #[tokio::test]
    async fn known_cpf_gets_a_verifiable_token() {
        let (handler, _) = setup();
        let before = Utc::now().timestamp();
        let envelope = run(&handler, cpf_event(ALICE_CPF)).await;
        let after = Utc::now().timestamp();

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.headers["Content-Type"], "application/json");

        let payload = body(&envelope);
        assert_eq!(payload["expires_in"], json!(7200));

        let token = payload["token"].as_str().unwrap();
        let claims = TokenVerifier::new(SECRET).verify(token, Utc::now()).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp >= before + TOKEN_TTL_SECS && claims.exp <= after + TOKEN_TTL_SECS);
    }

    #[tokio::test]
    async fn object_body_behaves_like_string_body() {
        let (handler, _) = setup();
        let from_object = run(&handler, event(json!({"body": {"cpf": ALICE_CPF}}))).await;
        let from_string = run(&handler, cpf_event(ALICE_CPF)).await;
        assert_eq!(from_object.status_code, 200);
        assert_eq!(from_string.status_code, 200);

        let verifier = TokenVerifier::new(SECRET);
        let a = verifier.verify(body(&from_object)["token"].as_str().unwrap(), Utc::now()).unwrap();
        let b = verifier.verify(body(&from_string)["token"].as_str().unwrap(), Utc::now()).unwrap();
        assert_eq!(a.sub, b.sub);
    }

    #[tokio::test]
    async fn malformed_json_body_is_500() {
        let (handler, _) = setup();
        let envelope = run(&handler, event(json!({"body": "{cpf: 123"}))).await;
        assert_eq!(envelope.status_code, 500);
        assert_eq!(body(&envelope), json!({"message": "Erro interno do servidor"}));
    }

    #[tokio::test]
    async fn store_failure_is_500_and_next_request_recovers() {
        let (handler, connector) = setup();
        assert_eq!(run(&handler, cpf_event(ALICE_CPF)).await.status_code, 200);

        connector.restart();
        let failed = run(&handler, cpf_event(ALICE_CPF)).await;
        assert_eq!(failed.status_code, 500);
        assert_eq!(body(&failed), json!({"message": "Erro interno do servidor"}));

        let recovered = run(&handler, cpf_event(ALICE_CPF)).await;
        assert_eq!(recovered.status_code, 200);
        assert_eq!(connector.connects(), 2);
    }

    #[tokio::test]
    async fn connect_failure_is_500_not_404() {
        let (handler, connector) = setup();
        connector.fail_next_connects(1);
        assert_eq!(run(&handler, cpf_event(ALICE_CPF)).await.status_code, 500);
        assert_eq!(run(&handler, cpf_event(ALICE_CPF)).await.status_code, 200);
    }

    #[tokio::test]
    async fn empty_secret_is_500() {
        let (handler, _) = setup_with_secret("");
        let envelope = run(&handler, cpf_event(ALICE_CPF)).await;
        assert_eq!(envelope.status_code, 500);
    }

    #[tokio::test]
    async fn raw_events_are_parsed_or_rejected() {
        let (handler, _) = setup();
        let ctx = InvocationContext::new();

        let ok = handler
            .handle_raw(&json!({"body": {"cpf": ALICE_CPF}}).to_string(), &ctx)
            .await;
        assert_eq!(ok.status_code, 200);

        let bad = handler.handle_raw("not an event", &ctx).await;
        assert_eq!(bad.status_code, 500);
    }
}
