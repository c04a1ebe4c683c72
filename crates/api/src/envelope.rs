//! Outbound response envelope: `{statusCode, headers, body}` with a
//! JSON-serialized body string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const MSG_CPF_REQUIRED: &str = "CPF é obrigatório";
pub const MSG_USER_NOT_FOUND: &str = "Usuário não encontrado";
pub const MSG_INTERNAL_ERROR: &str = "Erro interno do servidor";

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
    expires_in: i64,
}

impl ResponseEnvelope {
    /// 200 `{"token": ..., "expires_in": ...}`.
    pub fn success(token: &str, expires_in: i64) -> Self {
        Self::json(200, &TokenBody { token, expires_in })
    }

    pub fn validation_error() -> Self {
        Self::message(400, MSG_CPF_REQUIRED)
    }

    pub fn not_found() -> Self {
        Self::message(404, MSG_USER_NOT_FOUND)
    }

    pub fn internal_error() -> Self {
        Self::message(500, MSG_INTERNAL_ERROR)
    }

    fn message(status_code: u16, message: &str) -> Self {
        Self::json(status_code, &MessageBody { message })
    }

    fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());

        // Bodies are flat structs of strings/integers; encoding cannot fail.
        let body = serde_json::to_string(body).unwrap_or_default();

        Self {
            status_code,
            headers,
            body,
        }
    }
}
