//! Mock stores for testing.
//!
//! [`FailingStore`] fails every operation with a database error that carries
//! internal detail, so tests can check that the detail never reaches clients.

use async_trait::async_trait;
use petshelf::db::{CredentialStore, ProductStore, UserRecord};
use petshelf::types::{AppError, NewProduct, Product, ProductPatch, Result};

/// Detail embedded in every failure produced by [`FailingStore`].
pub const INTERNAL_DETAIL: &str = "connection refused by db-primary.internal:5432";

pub struct FailingStore;

fn failure() -> AppError {
    AppError::Database(INTERNAL_DETAIL.to_string())
}

#[async_trait]
impl CredentialStore for FailingStore {
    async fn insert_user(&self, _name: &str, _email: &str, _hash: &str) -> Result<UserRecord> {
        Err(failure())
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<UserRecord>> {
        Err(failure())
    }

    async fn find_user_by_id(&self, _id: &str) -> Result<Option<UserRecord>> {
        Err(failure())
    }
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn insert_product(&self, _owner_id: &str, _product: &NewProduct) -> Result<Product> {
        Err(failure())
    }

    async fn list_by_owner(&self, _owner_id: &str) -> Result<Vec<Product>> {
        Err(failure())
    }

    async fn update_by_id_and_owner(
        &self,
        _id: &str,
        _owner_id: &str,
        _patch: &ProductPatch,
    ) -> Result<Option<Product>> {
        Err(failure())
    }

    async fn delete_by_id_and_owner(&self, _id: &str, _owner_id: &str) -> Result<bool> {
        Err(failure())
    }
}
