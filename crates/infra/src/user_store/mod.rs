//! User lookup by CPF.
//!
//! [`UserStore`] is what the request handler talks to. The production
//! implementation is [`CachedUserStore`], which keeps one lazily-opened
//! connection per process and discards it after any failure; the actual
//! driver work is delegated to a [`UserConnector`] (`PostgresConnector` in
//! production, `InMemoryConnector` in tests and local runs).

mod cached;
mod in_memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use cpfauth_core::{Cpf, UserRecord};

pub use cached::CachedUserStore;
pub use in_memory::InMemoryConnector;
pub use postgres::PostgresConnector;

/// Lookup query. `$1` is the only input and is always bound, never formatted in.
pub const FIND_USER_BY_CPF: &str = "SELECT id, username, email FROM users WHERE cpf = $1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserStoreError {
    /// Opening a connection failed (unreachable host, bad credentials, timeout).
    #[error("connect failed: {0}")]
    Connect(String),

    /// The query failed on an open connection.
    #[error("query failed: {0}")]
    Query(String),

    /// A row came back but could not be mapped to a `UserRecord`.
    #[error("unexpected row shape: {0}")]
    Decode(String),
}

/// Read access to users, keyed by CPF.
///
/// `Ok(None)` is the normal "no such user" outcome; `Err` is reserved for
/// infrastructure failures.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<UserRecord>, UserStoreError>;
}

/// Driver-level operations behind [`CachedUserStore`].
#[async_trait]
pub trait UserConnector: Send + Sync {
    type Conn: Send;

    async fn connect(&self) -> Result<Self::Conn, UserStoreError>;

    async fn find_by_cpf(
        &self,
        conn: &mut Self::Conn,
        cpf: &Cpf,
    ) -> Result<Option<UserRecord>, UserStoreError>;

    /// Best-effort close. Errors are swallowed; the handle is discarded either way.
    async fn close(&self, conn: Self::Conn);
}
