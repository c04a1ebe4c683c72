//! Inbound event shape and the one place where its loose `body` is normalized.
//!
//! Invocation frameworks hand the payload over either as a JSON-encoded
//! string or as an already-decoded object. [`RequestBody::from_event`]
//! reduces both (and an absent body) to a single JSON object before anything
//! else looks at it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cpfauth_core::Cpf;

use crate::error::HandlerError;

/// Raw event as delivered by the invocation framework.
///
/// Only `body` is interpreted; any other fields (headers, request context,
/// ...) are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundEvent {
    /// Event whose body is a JSON-encoded string (the usual HTTP proxy shape).
    pub fn from_body_string(body: impl Into<String>) -> Self {
        Self {
            body: Some(Value::String(body.into())),
            extra: Map::new(),
        }
    }

    /// Event whose body has already been decoded.
    pub fn from_body_object(body: Map<String, Value>) -> Self {
        Self {
            body: Some(Value::Object(body)),
            extra: Map::new(),
        }
    }

    /// Short, log-safe description of the body (never the payload itself).
    pub fn body_kind(&self) -> &'static str {
        match &self.body {
            None | Some(Value::Null) => "absent",
            Some(Value::String(_)) => "string",
            Some(Value::Object(_)) => "object",
            Some(_) => "other",
        }
    }
}

/// Decoded request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    /// Normalize the event body.
    ///
    /// - string: parsed as a JSON object (anything else is `MalformedInput`)
    /// - object: used as-is
    /// - absent / null / any other JSON type: empty body
    pub fn from_event(event: &InboundEvent) -> Result<Self, HandlerError> {
        match &event.body {
            Some(Value::String(raw)) => serde_json::from_str::<Map<String, Value>>(raw)
                .map(Self)
                .map_err(|e| HandlerError::malformed(format!("body is not a JSON object: {e}"))),
            Some(Value::Object(map)) => Ok(Self(map.clone())),
            _ => Ok(Self::default()),
        }
    }

    /// Extract the `cpf` field.
    ///
    /// Absent, null or blank → `Validation`; present but not a string →
    /// `MalformedInput`.
    pub fn cpf(&self) -> Result<Cpf, HandlerError> {
        match self.0.get("cpf") {
            None | Some(Value::Null) => Err(HandlerError::Validation),
            Some(Value::String(raw)) => Cpf::parse(raw.as_str()).map_err(|_| HandlerError::Validation),
            Some(other) => Err(HandlerError::malformed(format!(
                "cpf must be a string, got {}",
                json_type(other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
