use crate::api::handlers::{auth, products};
use crate::api::ApiDoc;
use crate::auth::middleware::{auth_middleware, AccessGuard};
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Maximum accepted request body.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Routes mounted under `/api`.
pub fn create_router(guard: AccessGuard) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/openapi.json", get(openapi));

    let protected_routes = Router::new()
        // Protected routes (auth required)
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(guard, auth_middleware));

    public_routes.merge(protected_routes)
}

/// Full application: health check, `/api` routes and the HTTP layers.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", create_router(state.guard.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)),
        )
        .with_state(state)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
