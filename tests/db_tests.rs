//! Database integration tests
//!
//! These tests exercise the libsql store through its repository traits,
//! using in-memory SQLite and temporary files.

use petshelf::db::{CredentialStore, DatabaseProvider, ProductStore, TursoClient};
use petshelf::types::{AppError, AuthError, Category, NewProduct, ProductPatch};
use std::sync::Arc;

/// Test helper to create a TursoClient with in-memory database
async fn create_test_client() -> TursoClient {
    TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database")
}

fn bowl() -> NewProduct {
    NewProduct {
        name: "Water bowl".to_string(),
        category: Category::Cat,
        description: "Ceramic bowl".to_string(),
        price: 12.0,
        image_url: None,
        stock: 50,
    }
}

// ============= User Tests =============

#[tokio::test]
async fn test_insert_and_find_user() {
    let client = create_test_client().await;

    let inserted = client
        .insert_user("Test User", "test@example.com", "$argon2id$hash")
        .await
        .expect("insert user");

    let by_email = client
        .find_by_email("test@example.com")
        .await
        .expect("query")
        .expect("user exists");
    let by_id = client
        .find_user_by_id(&inserted.id)
        .await
        .expect("query")
        .expect("user exists");

    assert_eq!(by_email.id, inserted.id);
    assert_eq!(by_id.email, "test@example.com");
    assert_eq!(by_id.password_hash, "$argon2id$hash");
    assert_eq!(by_id.name, "Test User");
}

#[tokio::test]
async fn test_find_missing_user() {
    let client = create_test_client().await;

    assert!(client.find_by_email("ghost@example.com").await.unwrap().is_none());
    assert!(client.find_user_by_id("no-such-id").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_maps_to_already_exists() {
    let client = create_test_client().await;

    client
        .insert_user("First", "same@example.com", "hash-1")
        .await
        .expect("first insert");
    let err = client
        .insert_user("Second", "same@example.com", "hash-2")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Auth(AuthError::AlreadyExists)));

    let stored = client.find_by_email("same@example.com").await.unwrap().unwrap();
    assert_eq!(stored.name, "First");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_keep_email_unique() {
    let client = Arc::new(create_test_client().await);

    let inserts = (0..10).map(|i| {
        let client = client.clone();
        async move {
            client
                .insert_user(&format!("User {}", i), "race@example.com", "hash")
                .await
        }
    });
    let results = futures::future::join_all(inserts).await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, AppError::Auth(AuthError::AlreadyExists))));
}

// ============= Product Tests =============

#[tokio::test]
async fn test_products_are_scoped_by_owner() {
    let client = create_test_client().await;

    let first = client.insert_product("alice", &bowl()).await.unwrap();
    let second = client
        .insert_product(
            "alice",
            &NewProduct {
                name: "Scratching post".to_string(),
                ..bowl()
            },
        )
        .await
        .unwrap();
    client.insert_product("bob", &bowl()).await.unwrap();

    let alice = client.list_by_owner("alice").await.unwrap();
    assert_eq!(alice, vec![first, second], "insertion order is preserved");

    let bob = client.list_by_owner("bob").await.unwrap();
    assert_eq!(bob.len(), 1);
    assert!(client.list_by_owner("carol").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_requires_matching_owner() {
    let client = create_test_client().await;
    let product = client.insert_product("alice", &bowl()).await.unwrap();

    let patch = ProductPatch {
        stock: Some(0),
        image_url: Some("https://img.example/bowl.png".to_string()),
        ..Default::default()
    };

    let foreign = client
        .update_by_id_and_owner(&product.id, "bob", &patch)
        .await
        .unwrap();
    assert!(foreign.is_none());

    let updated = client
        .update_by_id_and_owner(&product.id, "alice", &patch)
        .await
        .unwrap()
        .expect("owner can update");
    assert_eq!(updated.stock, 0);
    assert_eq!(updated.image_url.as_deref(), Some("https://img.example/bowl.png"));
    assert_eq!(updated.name, product.name);
    assert_eq!(updated.owner_id, "alice");
}

#[tokio::test]
async fn test_delete_requires_matching_owner() {
    let client = create_test_client().await;
    let product = client.insert_product("alice", &bowl()).await.unwrap();

    assert!(!client.delete_by_id_and_owner(&product.id, "bob").await.unwrap());
    assert_eq!(client.list_by_owner("alice").await.unwrap().len(), 1);

    assert!(client.delete_by_id_and_owner(&product.id, "alice").await.unwrap());
    assert!(client.list_by_owner("alice").await.unwrap().is_empty());
}

// ============= Provider Tests =============

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("petshelf.db");
    let provider = DatabaseProvider::from_url(path.to_str().unwrap());

    {
        let client = provider.create_client().await.expect("open file db");
        client
            .insert_user("Persisted", "persist@example.com", "hash")
            .await
            .unwrap();
    }

    let reopened = provider.create_client().await.expect("reopen file db");
    let user = reopened
        .find_by_email("persist@example.com")
        .await
        .unwrap()
        .expect("user persisted");
    assert_eq!(user.name, "Persisted");
}

#[test]
fn test_provider_from_url() {
    assert_eq!(DatabaseProvider::from_url(":memory:"), DatabaseProvider::Memory);
    assert_eq!(DatabaseProvider::from_url(""), DatabaseProvider::Memory);
    assert_eq!(
        DatabaseProvider::from_url("shelf.db"),
        DatabaseProvider::SQLite {
            path: "shelf.db".to_string()
        }
    );
}
