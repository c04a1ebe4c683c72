//! Infrastructure layer: configuration and the user store.

pub mod config;
pub mod user_store;

pub use config::{AuthConfig, Config, ConfigError, DatabaseConfig, ServerConfig};
pub use user_store::{
    CachedUserStore, InMemoryConnector, PostgresConnector, UserConnector, UserStore,
    UserStoreError,
};
