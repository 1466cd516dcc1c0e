//! Product listing handlers.
//!
//! All routes here sit behind the access guard; the verified caller arrives
//! through the [`AuthUser`] extractor.

use crate::{
    auth::middleware::AuthUser,
    types::{CreateProductRequest, MessageResponse, Product, Result, UpdateProductRequest},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

/// Create a product owned by the caller.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    payload: std::result::Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let product = state.products.create(&ctx, payload).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// List the caller's products.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Products owned by the caller", body = Vec<Product>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.products.list_owned(&ctx).await?))
}

/// Update fields of one of the caller's products.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(payload) = payload?;
    Ok(Json(state.products.update(&ctx, &id, payload).await?))
}

/// Delete one of the caller's products.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    tag = "products",
    security(("bearer" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.products.delete(&ctx, &id).await?;

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
