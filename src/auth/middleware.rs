use crate::auth::jwt::TokenCodec;
use crate::types::{AppError, AuthContext, AuthError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Pulls the bare token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` as well as a bare `<token>`.
pub fn bearer_token(header: Option<&HeaderValue>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::NoToken)?;
    let value = value.to_str().map_err(|_| AuthError::Malformed)?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(AuthError::NoToken);
    }

    Ok(token)
}

/// Gate evaluated once per protected request.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    codec: Arc<TokenCodec>,
}

impl AccessGuard {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verifies the header and returns the caller's identity.
    pub fn authorize(&self, header: Option<&HeaderValue>) -> Result<AuthContext, AuthError> {
        let token = bearer_token(header)?;
        let claims = self.codec.verify(token)?;

        Ok(AuthContext::new(claims.sub))
    }
}

pub async fn auth_middleware(
    State(guard): State<AccessGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = guard.authorize(req.headers().get(header::AUTHORIZATION))?;

    tracing::debug!(owner_id = %ctx.owner_id, "request authenticated");
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

// Extractor for the verified identity
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Auth(AuthError::NoToken))
    }
}
