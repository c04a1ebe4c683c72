//! CPF → bearer token issuance: request mapping and the HTTP adapter.
//!
//! - `event`: inbound event shape and body decoding
//! - `envelope`: the `{statusCode, headers, body}` response shape
//! - `error`: handler failure taxonomy and its envelope mapping
//! - `handler`: the lookup-then-issue flow
//! - `app`: axum router exposing the handler over HTTP

pub mod app;
pub mod context;
pub mod envelope;
pub mod error;
pub mod event;
pub mod handler;

pub use context::InvocationContext;
pub use envelope::ResponseEnvelope;
pub use error::HandlerError;
pub use event::{InboundEvent, RequestBody};
pub use handler::AuthHandler;
