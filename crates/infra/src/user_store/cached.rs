use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use cpfauth_core::{Cpf, UserRecord};

use super::{UserConnector, UserStore, UserStoreError};

/// User store that reuses a single connection across calls.
///
/// ## Connection lifecycle
///
/// - The connection is opened on first use (and after any discard).
/// - It is reused by every later lookup while lookups keep succeeding.
/// - Any connect or query failure closes and discards it, so the *next* call
///   starts from a fresh connection. Nothing is retried within a call.
///
/// ## Concurrency
///
/// The slot is guarded by an async mutex held for the whole
/// open → query → (close) sequence, so concurrent invocations serialize on the
/// connection instead of racing on its creation or closing it mid-query.
/// If a lookup future is dropped mid-query the connection is dropped with it
/// and the slot stays empty.
pub struct CachedUserStore<C: UserConnector> {
    connector: C,
    slot: Mutex<Option<C::Conn>>,
}

impl<C: UserConnector> CachedUserStore<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            slot: Mutex::new(None),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Whether a connection is currently cached.
    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

#[async_trait]
impl<C: UserConnector> UserStore for CachedUserStore<C> {
    #[instrument(skip(self, cpf), fields(cpf = %cpf.masked()), err)]
    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<UserRecord>, UserStoreError> {
        let mut slot = self.slot.lock().await;

        let mut conn = match slot.take() {
            Some(conn) => conn,
            None => {
                debug!("opening store connection");
                self.connector.connect().await.inspect_err(|e| {
                    warn!(error = %e, "store connection failed");
                })?
            }
        };

        match self.connector.find_by_cpf(&mut conn, cpf).await {
            Ok(found) => {
                *slot = Some(conn);
                Ok(found)
            }
            Err(err) => {
                warn!(error = %err, "lookup failed; discarding store connection");
                self.connector.close(conn).await;
                Err(err)
            }
        }
    }
}
