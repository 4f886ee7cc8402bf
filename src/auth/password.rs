//! bcrypt password hashing.
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool.

use crate::error::{AppError, AppResult};

/// Shortest accepted password, in bytes.
pub const MIN_PASSWORD_LEN: usize = 8;
/// bcrypt ignores everything past 72 bytes.
pub const MAX_PASSWORD_LEN: usize = 72;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Check length limits and hash a new password.
    pub async fn hash(&self, password: &str) -> AppResult<String> {
        if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password.len()) {
            return Err(AppError::BadRequest(format!(
                "password must be between {} and {} bytes",
                MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
            )));
        }

        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Check a candidate password against a stored hash.
    pub async fn verify(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))
    }
}
