//! API request handlers.

/// Authentication handlers (register, login).
pub mod auth;
/// Owner-scoped product handlers.
pub mod products;
