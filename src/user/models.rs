use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::warn;

use crate::auth::Identity;
use crate::shared::AppError;

/// Database model for the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String, // Argon2 PHC string
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserModel {
    /// Creates a user with a freshly hashed password
    pub fn new(
        id: i64,
        email: &str,
        first_name: &str,
        last_name: &str,
        plaintext_password: &str,
    ) -> Result<Self, AppError> {
        let now = Utc::now();

        Ok(Self {
            id,
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password: hash_password(plaintext_password)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Checks a plaintext password against the stored hash
    ///
    /// An unparseable stored hash counts as a mismatch.
    pub fn password_matches(&self, plaintext: &str) -> bool {
        let parsed = match PasswordHash::new(&self.password) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(user_id = self.id, error = %e, "Stored password hash is unreadable");
                return false;
            }
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// Hashes a password into an Argon2 PHC string
pub fn hash_password(plaintext: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}
