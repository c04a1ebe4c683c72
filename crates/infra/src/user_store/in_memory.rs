use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use cpfauth_core::{Cpf, UserRecord};

use super::{UserConnector, UserStoreError};

/// In-memory stand-in for the relational store.
///
/// Intended for tests/dev. Clones share the same table and counters, so a
/// test can keep a handle while a [`CachedUserStore`](super::CachedUserStore)
/// owns another. Supports fault injection (`fail_next_connects`,
/// `fail_next_queries`) and simulated server restarts (`restart`), which
/// invalidate every connection opened before the call.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: RwLock<HashMap<String, UserRecord>>,
    epoch: AtomicU64,
    connects: AtomicUsize,
    closes: AtomicUsize,
    pending_connect_failures: AtomicUsize,
    pending_query_failures: AtomicUsize,
}

#[derive(Debug)]
pub struct InMemoryConnection {
    epoch: u64,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the user stored under `cpf`.
    pub fn insert(&self, cpf: impl Into<String>, user: UserRecord) {
        if let Ok(mut users) = self.inner.users.write() {
            users.insert(cpf.into(), user);
        }
    }

    pub fn fail_next_connects(&self, n: usize) {
        self.inner.pending_connect_failures.store(n, Ordering::SeqCst);
    }

    pub fn fail_next_queries(&self, n: usize) {
        self.inner.pending_query_failures.store(n, Ordering::SeqCst);
    }

    /// Terminate every connection opened so far.
    pub fn restart(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of successful connects.
    pub fn connects(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.inner.closes.load(Ordering::SeqCst)
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl UserConnector for InMemoryConnector {
    type Conn = InMemoryConnection;

    async fn connect(&self) -> Result<Self::Conn, UserStoreError> {
        if take_one(&self.inner.pending_connect_failures) {
            return Err(UserStoreError::Connect("injected connect failure".to_string()));
        }
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryConnection {
            epoch: self.inner.epoch.load(Ordering::SeqCst),
        })
    }

    async fn find_by_cpf(
        &self,
        conn: &mut Self::Conn,
        cpf: &Cpf,
    ) -> Result<Option<UserRecord>, UserStoreError> {
        if conn.epoch != self.inner.epoch.load(Ordering::SeqCst) {
            return Err(UserStoreError::Query("connection terminated by server".to_string()));
        }
        if take_one(&self.inner.pending_query_failures) {
            return Err(UserStoreError::Query("injected query failure".to_string()));
        }

        let users = self
            .inner
            .users
            .read()
            .map_err(|_| UserStoreError::Query("lock poisoned".to_string()))?;
        Ok(users.get(cpf.as_str()).cloned())
    }

    async fn close(&self, _conn: Self::Conn) {
        self.inner.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let connector = InMemoryConnector::new();
        connector.insert("123", UserRecord::new(1, "u", "u@x"));

        let mut conn = connector.connect().await.unwrap();
        let hit = connector.find_by_cpf(&mut conn, &Cpf::parse("123").unwrap()).await;
        assert_eq!(hit.unwrap().map(|u| u.username), Some("u".to_string()));

        let padded = connector.find_by_cpf(&mut conn, &Cpf::parse(" 123").unwrap()).await;
        assert_eq!(padded, Ok(None));
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let connector = InMemoryConnector::new();
        connector.fail_next_connects(2);
        assert!(connector.connect().await.is_err());
        assert!(connector.connect().await.is_err());
        assert!(connector.connect().await.is_ok());
        assert_eq!(connector.connects(), 1);
    }
}
