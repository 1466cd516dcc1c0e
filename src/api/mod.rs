//! HTTP API Handlers and Routes
//!
//! # API Endpoints
//!
//! ## Authentication
//! - `POST /api/register` - Register new user
//! - `POST /api/login` - Login and receive a session token
//!
//! ## Products (token required)
//! - `POST /api/products` - Create a product owned by the caller
//! - `GET /api/products` - List the caller's products
//! - `PUT /api/products/{id}` - Update one of the caller's products
//! - `DELETE /api/products/{id}` - Delete one of the caller's products
//!
//! ## Misc
//! - `GET /health` - Health check endpoint
//! - `GET /api/openapi.json` - OpenAPI document
//!
//! # Authentication
//!
//! Protected endpoints take the token from the `Authorization` header, with
//! or without the `Bearer ` prefix:
//! ```text
//! Authorization: Bearer <token>
//! ```

use crate::types::{
    Category, CreateProductRequest, LoginRequest, LoginResponse, MessageResponse, Product,
    RegisterRequest, UpdateProductRequest, User,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::update_product,
        handlers::products::delete_product,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        User,
        Category,
        Product,
        CreateProductRequest,
        UpdateProductRequest,
        MessageResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "products", description = "Owner-scoped product listings")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
