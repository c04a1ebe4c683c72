use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::context::InvocationContext;
use crate::envelope::ResponseEnvelope;
use crate::event::InboundEvent;
use crate::handler::AuthHandler;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// `POST /auth`: the request body is the event body.
///
/// An empty request body counts as an absent body (→ 400), matching what
/// HTTP proxies deliver for body-less requests.
pub async fn issue(
    State(handler): State<Arc<AuthHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let ctx = context_from(&headers);

    let event = if body.is_empty() {
        InboundEvent::default()
    } else {
        match String::from_utf8(body.to_vec()) {
            Ok(text) => InboundEvent::from_body_string(text),
            Err(_) => {
                tracing::warn!(request_id = %ctx.request_id(), "request body is not UTF-8");
                return ResponseEnvelope::internal_error().into_response();
            }
        }
    };

    handler.handle(&event, &ctx).await.into_response()
}

/// `POST /invoke`: the request body is a whole inbound event; the envelope
/// comes back as JSON with HTTP 200, the way function runtimes return it.
pub async fn invoke(
    State(handler): State<Arc<AuthHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let ctx = context_from(&headers);
    let envelope = match String::from_utf8(body.to_vec()) {
        Ok(raw) => handler.handle_raw(&raw, &ctx).await,
        Err(_) => {
            tracing::warn!(request_id = %ctx.request_id(), "event is not UTF-8");
            ResponseEnvelope::internal_error()
        }
    };
    (StatusCode::OK, Json(envelope)).into_response()
}

fn context_from(headers: &HeaderMap) -> InvocationContext {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .map(InvocationContext::with_request_id)
        .unwrap_or_default()
}
