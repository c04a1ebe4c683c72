//! User record read from the store.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// Row of the `users` table as seen by the issuance flow.
///
/// Read-only; fetched fresh on every request and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
        }
    }
}
