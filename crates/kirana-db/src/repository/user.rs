//! # User Repository
//!
//! Database operations for user accounts.
//!
//! Deleting a user cascades through stores to products, bills and bill
//! items; the schema owns that, this repository just issues the delete.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::validation::{validate_name, validate_phone};
use kirana_core::{NewUser, User, UserPatch};

const USER_COLUMNS: &str =
    "id, name, phone, email, password_hash, addr, gst_no, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user account.
    ///
    /// ## Returns
    /// * `Ok(User)` - The created row
    /// * `Err(DbError::UniqueViolation)` - Phone or email already taken
    pub async fn create(&self, new_user: NewUser) -> DbResult<User> {
        validate_name("name", &new_user.name)?;
        validate_phone(&new_user.phone)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            phone: new_user.phone,
            email: new_user.email,
            password_hash: new_user.password_hash,
            addr: new_user.addr,
            gst_no: new_user.gst_no,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %user.id, "Creating user");

        sqlx::query(
            "INSERT INTO users (id, name, phone, email, password_hash, addr, gst_no, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.addr)
        .bind(&user.gst_no)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by phone number (the login identity).
    pub async fn get_by_phone(&self, phone: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = ?1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Applies a partial update and returns the updated row.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - User doesn't exist
    pub async fn update(&self, id: &str, patch: &UserPatch) -> DbResult<User> {
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(phone) = &patch.phone {
            validate_phone(phone)?;
        }

        let mut user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))?;

        if patch.is_empty() {
            return Ok(user);
        }

        patch.apply(&mut user);
        user.updated_at = Utc::now();

        debug!(id = %user.id, "Updating user");

        sqlx::query(
            "UPDATE users SET
                 name = ?2, phone = ?3, email = ?4, addr = ?5, gst_no = ?6, updated_at = ?7
             WHERE id = ?1",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.addr)
        .bind(&user.gst_no)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user and, by cascade, every store they own.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
