use crate::auth::jwt::TokenCodec;
use crate::auth::password::{hash_password, verify_password};
use crate::db::CredentialStore;
use crate::types::{AppError, AuthError, LoginResponse, Result, User};
use std::sync::Arc;

/// Emails are stored and looked up trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration and login.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    codec: Arc<TokenCodec>,
    /// Verified against when the email is unknown so both login failures cost the same.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, codec: Arc<TokenCodec>) -> Result<Self> {
        let dummy_hash = hash_password(&uuid::Uuid::new_v4().to_string())?;

        Ok(Self {
            store,
            codec,
            dummy_hash,
        })
    }

    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// Creates a new identity. Fails with `AlreadyExists` if the email is taken.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Name, email and password are required".to_string(),
            ));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::AlreadyExists.into());
        }

        let password_hash = hash_password(password)?;

        // The unique index turns a lost race into AlreadyExists as well
        let record = self.store.insert_user(name, &email, &password_hash).await?;
        tracing::info!(user_id = %record.id, "user registered");

        Ok(record.into())
    }

    /// Checks credentials and issues a session token.
    ///
    /// Unknown email and wrong password are the same `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_by_email(&email).await? else {
            verify_password(password, &self.dummy_hash);
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash) {
            tracing::warn!(user_id = %user.id, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.codec.issue(&user.id)?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginResponse {
            token,
            user_id: user.id,
            expires_in: self.codec.expiry_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TursoClient;

    async fn create_test_service() -> AuthService {
        let store = Arc::new(TursoClient::new_memory().await.expect("in-memory db"));
        let codec = Arc::new(TokenCodec::new(b"service-test-secret-32-bytes-long", 3600));
        AuthService::new(store, codec).expect("service")
    }

    #[tokio::test]
    async fn test_register_then_login_yields_own_identity() {
        let service = create_test_service().await;

        let user = service
            .register("Alice", "alice@example.com", "s3cret-pass")
            .await
            .expect("register");
        let outcome = service
            .login("alice@example.com", "s3cret-pass")
            .await
            .expect("login");

        assert_eq!(outcome.user_id, user.id);
        assert_eq!(outcome.expires_in, 3600);
        let claims = service.codec().verify(&outcome.token).expect("valid token");
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn test_register_does_not_expose_hash() {
        let service = create_test_service().await;

        let user = service
            .register("Bob", "bob@example.com", "password123")
            .await
            .expect("register");

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "bob@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let service = create_test_service().await;

        service
            .register("First", "dup@example.com", "password123")
            .await
            .expect("first register");
        let err = service
            .register("Second", "dup@example.com", "password456")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Auth(AuthError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_email_comparison_ignores_case_and_whitespace() {
        let service = create_test_service().await;

        service
            .register("Carol", "Carol@Example.com", "password123")
            .await
            .expect("register");

        let err = service
            .register("Carol again", "  carol@example.COM ", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::AlreadyExists)));

        assert!(service.login("CAROL@example.com", "password123").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = create_test_service().await;
        service
            .register("Dave", "dave@example.com", "right-password")
            .await
            .expect("register");

        let wrong_password = service
            .login("dave@example.com", "wrong-password")
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@example.com", "right-password")
            .await
            .unwrap_err();

        assert!(matches!(
            wrong_password,
            AppError::Auth(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            unknown_email,
            AppError::Auth(AuthError::InvalidCredentials)
        ));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let service = create_test_service().await;

        for (name, email, password) in [
            ("", "a@example.com", "password123"),
            ("Name", "  ", "password123"),
            ("Name", "a@example.com", ""),
        ] {
            let err = service.register(name, email, password).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_stores_one_identity() {
        let service = Arc::new(create_test_service().await);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .register(&format!("Racer {}", i), "race@example.com", "password123")
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.expect("task panicked") {
                Ok(_) => created += 1,
                Err(AppError::Auth(AuthError::AlreadyExists)) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(created, 1, "exactly one registration should win");
    }
}
