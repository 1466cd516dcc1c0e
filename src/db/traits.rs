//! Repository traits for persistence
//!
//! The auth and ownership logic only talks to these traits, so the storage
//! engine can be swapped without touching it. Every product operation that
//! reads or mutates a single record is keyed by `(id, owner_id)` jointly.
//!
//! # Example
//!
//! ```rust,ignore
//! use petshelf::db::DatabaseProvider;
//!
//! // In-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // File-based SQLite
//! let db = DatabaseProvider::SQLite { path: "petshelf.db".into() }.create_client().await?;
//! ```

use crate::types::{NewProduct, Product, ProductPatch, Result};
use async_trait::async_trait;

/// User record from the database
pub use super::turso::UserRecord;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Picks a provider from a database URL/path. `:memory:` or an empty
    /// string selects the in-memory database.
    pub fn from_url(url: &str) -> Self {
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: url.to_string(),
            }
        }
    }

    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<super::turso::TursoClient> {
        match self {
            DatabaseProvider::Memory => super::turso::TursoClient::new_memory().await,
            DatabaseProvider::SQLite { path } => super::turso::TursoClient::new_local(path).await,
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                super::turso::TursoClient::new_remote(url.clone(), auth_token.clone()).await
            }
        }
    }
}

impl std::fmt::Display for DatabaseProvider {
    // Never prints credentials
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseProvider::Memory => f.write_str("memory"),
            DatabaseProvider::SQLite { path } => write!(f, "sqlite:{}", path),
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, .. } => write!(f, "turso:{}", url),
        }
    }
}

/// Storage for user identities.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user and return the stored record.
    ///
    /// Fails with `AuthError::AlreadyExists` when the email is taken, including
    /// when a concurrent insert wins the race.
    async fn insert_user(&self, name: &str, email: &str, password_hash: &str)
        -> Result<UserRecord>;

    /// Get a user by (already normalised) email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Get a user by ID
    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>>;
}

/// Owner-scoped storage for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a product for `owner_id` and return the stored record.
    async fn insert_product(&self, owner_id: &str, product: &NewProduct) -> Result<Product>;

    /// All products belonging to `owner_id`, in insertion order.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Product>>;

    /// Apply `patch` to the product matching both `id` and `owner_id`.
    ///
    /// Returns `None` when no such product exists for that owner.
    async fn update_by_id_and_owner(
        &self,
        id: &str,
        owner_id: &str,
        patch: &ProductPatch,
    ) -> Result<Option<Product>>;

    /// Delete the product matching both `id` and `owner_id`.
    ///
    /// Returns `false` when nothing matched.
    async fn delete_by_id_and_owner(&self, id: &str, owner_id: &str) -> Result<bool>;
}
