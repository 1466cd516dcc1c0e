//! # PetShelf
//!
//! A multi-tenant listing API for pet supplies. Users register and log in,
//! then manage products that only they can see, change, or delete.
//!
//! ## Overview
//!
//! PetShelf can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `petshelf-server` binary
//! 2. **As a library** - Mount [`api::routes::create_app`] in your own Axum service
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use petshelf::{api::routes::create_app, auth::jwt::TokenCodec, db::TursoClient, AppState};
//! use std::sync::Arc;
//!
//! let store = Arc::new(TursoClient::new_memory().await?);
//! let codec = Arc::new(TokenCodec::new(secret.as_bytes(), 3600));
//! let app = create_app(AppState::new(store, codec)?);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - password hashing, session tokens, access guard
//! - [`db`] - repository traits and the libsql store
//! - [`products`] - owner-scoped product service
//! - [`types`] - Common types and error handling
//! - [`utils`] - configuration

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication and the access guard.
pub mod auth;
/// Persistence traits and the libsql store.
pub mod db;
/// Owner-scoped product service.
pub mod products;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use db::TursoClient;
pub use types::{AppError, Result};
pub use utils::config::PetShelfConfig;

use crate::auth::jwt::TokenCodec;
use crate::auth::middleware::AccessGuard;
use crate::auth::service::AuthService;
use crate::db::{CredentialStore, ProductStore};
use crate::products::ProductService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub auth_service: Arc<AuthService>,
    /// Owner-scoped product operations
    pub products: Arc<ProductService>,
    /// Token gate for protected routes
    pub guard: AccessGuard,
}

impl AppState {
    /// Wire the services to one store and one token codec.
    pub fn new<S>(store: Arc<S>, codec: Arc<TokenCodec>) -> Result<Self>
    where
        S: CredentialStore + ProductStore + 'static,
    {
        let credentials: Arc<dyn CredentialStore> = store.clone();
        let product_store: Arc<dyn ProductStore> = store;

        Ok(Self {
            auth_service: Arc::new(AuthService::new(credentials, codec.clone())?),
            products: Arc::new(ProductService::new(product_store)),
            guard: AccessGuard::new(codec),
        })
    }
}
