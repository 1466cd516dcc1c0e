use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Stock applied to a product when the client does not specify one.
pub const DEFAULT_STOCK: i64 = 50;

// ============= Authentication Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: String,
    /// Token validity in seconds
    pub expires_in: i64,
}

/// Public view of a registered identity. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owner id of the authenticated user
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Verified identity attached to a protected request by the access guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub owner_id: String,
}

impl AuthContext {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

// ============= Product Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dog,
    Cat,
    Bird,
    Fish,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Dog,
        Category::Cat,
        Category::Bird,
        Category::Fish,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dog => "dog",
            Category::Cat => "cat",
            Category::Bird => "bird",
            Category::Fish => "fish",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Invalid category '{}'. Expected one of: dog, cat, bird, fish, other",
                    s
                ))
            })
    }
}

/// A stored listing, always bound to the user who created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stock: i64,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Body of `POST /api/products`.
///
/// `category` is parsed by the service, so unknown values become a 400.
/// There is no owner field; keys such as `ownerId` or `user` are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
}

/// Body of `PUT /api/products/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
}

/// Validated product fields ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub stock: i64,
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============= Error Types =============

/// Authentication failures.
///
/// The four token variants are all reported to clients as a plain 401 but
/// stay distinct for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("no token provided")]
    NoToken,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    AlreadyExists,
}

impl AuthError {
    /// True for the failures produced by the access guard.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::NoToken | AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Auth(err) if err.is_token_error() => {
                tracing::warn!(reason = %err, "rejected unauthenticated request");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AppError::Auth(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Database(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rstest::rstest;

    #[rstest]
    #[case("dog", Category::Dog)]
    #[case("cat", Category::Cat)]
    #[case("bird", Category::Bird)]
    #[case("fish", Category::Fish)]
    #[case("other", Category::Other)]
    fn test_category_parses_known_values(#[case] raw: &str, #[case] expected: Category) {
        assert_eq!(raw.parse::<Category>().unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("reptile")]
    #[case("Dog")]
    #[case("")]
    fn test_category_rejects_unknown_values(#[case] raw: &str) {
        let err = raw.parse::<Category>().unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product {
            id: "p1".to_string(),
            name: "Leash".to_string(),
            category: Category::Dog,
            description: "Nylon leash".to_string(),
            price: 9.99,
            image_url: None,
            stock: DEFAULT_STOCK,
            owner_id: "u1".to_string(),
            created_at: 0,
            updated_at: 0,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["category"], "dog");
        assert_eq!(value["ownerId"], "u1");
        assert_eq!(value["stock"], 50);
        assert!(value.get("imageUrl").is_none());
    }

    #[test]
    fn test_create_request_ignores_owner_fields() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Leash",
            "category": "dog",
            "description": "Nylon leash",
            "price": 9.99,
            "ownerId": "someone-else",
            "user": "someone-else"
        }))
        .unwrap();

        assert_eq!(req.name, "Leash");
        assert_eq!(req.stock, None);
    }

    #[rstest]
    #[case(AppError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Auth(AuthError::AlreadyExists), StatusCode::BAD_REQUEST)]
    #[case(AppError::Auth(AuthError::InvalidCredentials), StatusCode::BAD_REQUEST)]
    #[case(AppError::Auth(AuthError::NoToken), StatusCode::UNAUTHORIZED)]
    #[case(AppError::Auth(AuthError::InvalidSignature), StatusCode::UNAUTHORIZED)]
    #[case(AppError::Auth(AuthError::Expired), StatusCode::UNAUTHORIZED)]
    #[case(AppError::Auth(AuthError::Malformed), StatusCode::UNAUTHORIZED)]
    #[case(AppError::NotFound("Product not found".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::Database("disk on fire".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_status_mapping(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }
}
