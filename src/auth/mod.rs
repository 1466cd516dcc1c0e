//! Authentication: password hashing, session tokens and the access guard.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - HS256 session token issuing and verification
//! - [`auth::service`](crate::auth::service) - registration and login
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractor for protected routes
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id (memory-hard) with a fresh salt per hash
//! - **Session Tokens**: HS256 JWTs, one hour by default, not revocable
//! - **Enumeration hardening**: unknown email and wrong password fail identically
//!
//! # Extracting the caller in handlers
//!
//! ```ignore
//! async fn protected_handler(AuthUser(ctx): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", ctx.owner_id)
//! }
//! ```
//!
//! # Configuration
//!
//! Configure via `petshelf.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"  # name of the env var holding the secret
//! token_expiry_secs = 3600
//! ```

/// Session token generation and validation.
pub mod jwt;
/// Access guard middleware and extractor for protected routes.
pub mod middleware;
/// Password hashing.
pub mod password;
/// Registration and login orchestration.
pub mod service;
