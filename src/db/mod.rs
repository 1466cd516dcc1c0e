//! Persistence layer.
//!
//! - [`traits`] - repository traits the services depend on
//!   ([`CredentialStore`], [`ProductStore`]) and backend selection
//!   ([`DatabaseProvider`])
//! - [`turso`] - libsql implementation (in-memory, local SQLite file, or
//!   remote Turso with the `turso` feature)

#![allow(missing_docs)]

pub mod traits;
pub mod turso;

pub use traits::{CredentialStore, DatabaseProvider, ProductStore, UserRecord};
pub use turso::TursoClient;
