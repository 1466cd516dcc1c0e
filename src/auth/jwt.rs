use crate::types::{AppError, AuthError, Claims, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt;

/// Default session lifetime: one hour.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 3600;

/// Issues and verifies HS256-signed session tokens.
///
/// The signing secret is handed in once at startup and never changes for
/// the lifetime of the codec. Share it behind an `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: i64,
}

impl TokenCodec {
    /// Creates a codec.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing JWTs (should be at least 32 bytes)
    /// * `expiry_secs` - Token validity in seconds
    pub fn new(secret: &[u8], expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_secs,
        }
    }

    /// Token validity in seconds.
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_secs
    }

    /// Issues a token for `owner_id`, valid from now.
    pub fn issue(&self, owner_id: &str) -> Result<String> {
        self.issue_at(owner_id, Utc::now())
    }

    /// Issues a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, owner_id: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let expires_at = Duration::try_seconds(self.expiry_secs)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Token expiry of {}s is out of range",
                    self.expiry_secs
                ))
            })?;

        let claims = Claims {
            sub: owner_id.to_string(),
            iat: issued_at.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry, returning the claims.
    ///
    /// A token is valid strictly before its `exp` second.
    pub fn verify(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            })?;

        // jsonwebtoken only rejects `exp < now`
        if claims.exp as i64 <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[redacted]")
            .field("expiry_secs", &self.expiry_secs)
            .finish()
    }
}
