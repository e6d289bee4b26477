//! # Store Repository
//!
//! Database operations for stores: the tenant boundary of the system.
//! Every search and billing operation downstream is scoped to one store.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::validation::validate_name;
use kirana_core::{NewStore, Store, StorePatch, StoreSummary};

const STORE_COLUMNS: &str =
    "id, user_id, name, owner_name, email, phone, addr, gst_no, created_at, updated_at";

/// Repository for store database operations.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    /// Creates a new StoreRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Creates a store owned by an existing user.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Owner doesn't exist
    pub async fn create(&self, new_store: NewStore) -> DbResult<Store> {
        validate_name("name", &new_store.name)?;
        validate_name("owner_name", &new_store.owner_name)?;

        let now = Utc::now();
        let store = Store {
            id: Uuid::new_v4().to_string(),
            user_id: new_store.user_id,
            name: new_store.name,
            owner_name: new_store.owner_name,
            email: new_store.email,
            phone: new_store.phone,
            addr: new_store.addr,
            gst_no: new_store.gst_no,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %store.id, user_id = %store.user_id, "Creating store");

        sqlx::query(
            "INSERT INTO stores (id, user_id, name, owner_name, email, phone, addr, gst_no, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&store.id)
        .bind(&store.user_id)
        .bind(&store.name)
        .bind(&store.owner_name)
        .bind(&store.email)
        .bind(&store.phone)
        .bind(&store.addr)
        .bind(&store.gst_no)
        .bind(store.created_at)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(store)
    }

    /// Gets a store by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Lists a user's stores, newest first, with limit/offset pagination.
    pub async fn list_by_user(&self, user_id: &str, limit: u32, offset: u32) -> DbResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {STORE_COLUMNS} FROM stores
             WHERE user_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2 OFFSET ?3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Counts products in one store.
    pub async fn total_products(&self, store_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE store_id = ?1")
                .bind(store_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Gets a store together with its inventory size, for dashboards.
    pub async fn summarize(&self, store_id: &str) -> DbResult<Option<StoreSummary>> {
        let Some(store) = self.get_by_id(store_id).await? else {
            return Ok(None);
        };

        let total_products = self.total_products(store_id).await?;

        Ok(Some(StoreSummary {
            store,
            total_products,
        }))
    }

    /// Applies a partial update and returns the updated row.
    ///
    /// Bills created before the edit keep their snapshotted identity
    /// fields; only the live store record changes.
    pub async fn update(&self, id: &str, patch: &StorePatch) -> DbResult<Store> {
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(owner_name) = &patch.owner_name {
            validate_name("owner_name", owner_name)?;
        }

        let mut store = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Store", id))?;

        if patch.is_empty() {
            return Ok(store);
        }

        patch.apply(&mut store);
        store.updated_at = Utc::now();

        debug!(id = %store.id, "Updating store");

        sqlx::query(
            "UPDATE stores SET
                 name = ?2, owner_name = ?3, email = ?4, phone = ?5, addr = ?6,
                 gst_no = ?7, updated_at = ?8
             WHERE id = ?1",
        )
        .bind(&store.id)
        .bind(&store.name)
        .bind(&store.owner_name)
        .bind(&store.email)
        .bind(&store.phone)
        .bind(&store.addr)
        .bind(&store.gst_no)
        .bind(store.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(store)
    }

    /// Deletes a store and, by cascade, its products and bills.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting store");

        let result = sqlx::query("DELETE FROM stores WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
