//! `cpfauth-core` — domain primitives shared by the issuance flow.
//!
//! This crate contains **pure domain** types (no storage, HTTP or signing concerns).

pub mod cpf;
pub mod error;
pub mod id;
pub mod user;

pub use cpf::Cpf;
pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use user::UserRecord;
