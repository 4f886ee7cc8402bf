//! JWT issuing and validation for logged-in accounts.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// JWT claims for an authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: i32,
    /// Account number.
    pub number: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    /// Token validity duration in hours.
    token_duration_hours: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_duration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_duration_hours,
        }
    }

    /// Get token duration in hours.
    pub fn token_duration_hours(&self) -> i64 {
        self.token_duration_hours
    }

    /// Generate a JWT token for an account.
    pub fn generate_token(&self, account_id: i32, number: i64) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_duration_hours);

        let claims = Claims {
            sub: account_id,
            number,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a JWT token.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                AppError::Unauthorized(format!("Invalid token: {}", e))
            })?;

        Ok(token_data.claims)
    }
}
