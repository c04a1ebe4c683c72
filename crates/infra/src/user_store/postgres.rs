//! PostgreSQL driver for the user store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | UserStoreError |
//! |------------|----------------|
//! | any error while connecting (or connect timeout) | `Connect` |
//! | `ColumnNotFound` / `ColumnDecode` / `Decode` | `Decode` |
//! | anything else during the query | `Query` |

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{Connection, PgConnection, Row};
use tracing::{debug, instrument};

use cpfauth_core::{Cpf, UserRecord};

use crate::config::DatabaseConfig;

use super::{UserConnector, UserStoreError, FIND_USER_BY_CPF};

const DEFAULT_PORT: u16 = 5432;

/// Opens single `PgConnection`s and runs the CPF lookup on them.
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PostgresConnector {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: connect_options(config),
            connect_timeout: config.connect_timeout,
        }
    }

    pub fn options(&self) -> &PgConnectOptions {
        &self.options
    }
}

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(config.host.trim_start_matches('[').trim_end_matches(']'))
        .port(config.port.unwrap_or(DEFAULT_PORT))
        .database(&config.name)
        .username(&config.user)
        .password(&config.password)
}

fn row_to_user(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord::new(
        row.try_get::<i32, _>("id")?,
        row.try_get::<String, _>("username")?,
        row.try_get::<String, _>("email")?,
    ))
}

fn map_query_error(err: sqlx::Error) -> UserStoreError {
    match err {
        sqlx::Error::ColumnNotFound(_) | sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            UserStoreError::Decode(err.to_string())
        }
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
            UserStoreError::Query(format!("database error {code}: {}", db_err.message()))
        }
        _ => UserStoreError::Query(err.to_string()),
    }
}

#[async_trait]
impl UserConnector for PostgresConnector {
    type Conn = PgConnection;

    #[instrument(skip(self), err)]
    async fn connect(&self) -> Result<Self::Conn, UserStoreError> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(UserStoreError::Connect(e.to_string())),
            Err(_) => Err(UserStoreError::Connect(format!(
                "timed out after {:?}",
                self.connect_timeout
            ))),
        }
    }

    async fn find_by_cpf(
        &self,
        conn: &mut Self::Conn,
        cpf: &Cpf,
    ) -> Result<Option<UserRecord>, UserStoreError> {
        let row = sqlx::query(FIND_USER_BY_CPF)
            .bind(cpf.as_str())
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_query_error)?;

        row.as_ref()
            .map(row_to_user)
            .transpose()
            .map_err(map_query_error)
    }

    async fn close(&self, conn: Self::Conn) {
        if let Err(e) = conn.close().await {
            debug!(error = %e, "error while closing store connection (ignored)");
        }
    }
}
