//! # Password Hashing
//!
//! Argon2 helpers for the authentication collaborator. The repositories
//! only ever see the resulting PHC hash string; plaintext passwords stop
//! here.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{DbError, DbResult};

/// Hashes a plaintext password into a PHC-format string with a fresh
/// random salt.
///
/// ## Example
/// ```rust,ignore
/// let hash = auth::hash_password("s3cret")?;
/// let user = db.users().create(NewUser { password_hash: hash, .. }).await?;
/// ```
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Password hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only when the stored hash
/// itself is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> DbResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| DbError::Internal(format!("Stored password hash is invalid: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

// =============================================================================
// Unit Tests
// =============================================================================
