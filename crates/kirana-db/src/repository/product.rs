//! # Product Repository
//!
//! Inventory CRUD and the two product search paths.
//!
//! ## Two-Tier Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     How Product Search Works                        │
//! │                                                                     │
//! │  Clerk types: "paracetmol"   (typo)                                 │
//! │       │                                                             │
//! │       ├── search()       SQL LIKE on name/batch, LIMIT 5            │
//! │       │                  fast path for exact/partial input          │
//! │       │                  → no rows (the typo matches nothing)       │
//! │       │                                                             │
//! │       └── full_search()  store's rows fetched via the composite     │
//! │                          (store_id, name, batch) index, scored      │
//! │                          with trigram similarity in kirana-core     │
//! │                          → "Paracetamol 500" ranked first           │
//! │                                                                     │
//! │  Both paths are scoped to ONE store; a query can never see          │
//! │  another tenant's inventory.                                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::similarity::best_similarity;
use kirana_core::validation::{
    validate_batch, validate_mrp, validate_name, validate_percent, validate_search_query,
    validate_stock,
};
use kirana_core::{
    NewProduct, Product, ProductPatch, DEFAULT_UNIT, SEARCH_RESULT_LIMIT, SIMILARITY_THRESHOLD,
};

const PRODUCT_COLUMNS: &str = "id, store_id, name, quantity, pack_size, gst_percent, expire, \
                               batch, mrp, unit, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product in a store's inventory.
    pub async fn create(&self, new_product: NewProduct) -> DbResult<Product> {
        validate_name("name", &new_product.name)?;
        validate_mrp(new_product.mrp)?;
        validate_percent("gst_percent", new_product.gst_percent as f64)?;
        if let Some(batch) = &new_product.batch {
            validate_batch(batch)?;
        }
        if let Some(quantity) = new_product.quantity {
            validate_stock(quantity)?;
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            store_id: new_product.store_id,
            name: new_product.name,
            quantity: new_product.quantity.unwrap_or(0),
            pack_size: new_product.pack_size,
            gst_percent: new_product.gst_percent,
            expire: new_product.expire,
            batch: new_product.batch,
            mrp: new_product.mrp,
            unit: new_product.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, store_id = %product.store_id, "Creating product");

        sqlx::query(
            "INSERT INTO products (id, store_id, name, quantity, pack_size, gst_percent,
                                   expire, batch, mrp, unit, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&product.id)
        .bind(&product.store_id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.pack_size)
        .bind(product.gst_percent)
        .bind(product.expire)
        .bind(&product.batch)
        .bind(product.mrp)
        .bind(&product.unit)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Exact/substring search: case-insensitive match on name OR batch,
    /// scoped to one store, at most [`SEARCH_RESULT_LIMIT`] rows in
    /// storage order.
    ///
    /// Empty queries and unknown stores both return an empty vec, never
    /// an error.
    pub async fn search(&self, store_id: &str, query: &str) -> DbResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return Ok(Vec::new());
        }

        debug!(store_id = %store_id, query = %query, "Substring product search");

        let pattern = format!("%{}%", escape_like(&query));

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE store_id = ?1
               AND (name LIKE ?2 ESCAPE '\\' OR batch LIKE ?2 ESCAPE '\\')
             LIMIT ?3"
        ))
        .bind(store_id)
        .bind(&pattern)
        .bind(SEARCH_RESULT_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Fuzzy search: trigram similarity against name and batch, ranked
    /// descending by the greater of the two scores.
    ///
    /// A product qualifies when `max(sim(query, name), sim(query, batch))`
    /// exceeds [`SIMILARITY_THRESHOLD`]. All qualifying rows are returned
    /// (no limit); scoring runs over the single store's inventory only.
    pub async fn full_search(&self, store_id: &str, query: &str) -> DbResult<Vec<Product>> {
        let query = validate_search_query(query)?;
        if query.is_empty() {
            return Ok(Vec::new());
        }

        debug!(store_id = %store_id, query = %query, "Fuzzy product search");

        let candidates = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE store_id = ?1"
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        let mut scored: Vec<(f64, Product)> = candidates
            .into_iter()
            .filter_map(|p| {
                let score = best_similarity(&query, &p.name, p.batch.as_deref());
                (score > SIMILARITY_THRESHOLD).then_some((score, p))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        debug!(count = scored.len(), "Fuzzy search returned products");
        Ok(scored.into_iter().map(|(_, p)| p).collect())
    }

    /// Applies a partial update and returns the updated row.
    pub async fn update(&self, id: &str, patch: &ProductPatch) -> DbResult<Product> {
        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(mrp) = patch.mrp {
            validate_mrp(mrp)?;
        }
        if let Some(gst) = patch.gst_percent {
            validate_percent("gst_percent", gst as f64)?;
        }
        if let Some(Some(batch)) = &patch.batch {
            validate_batch(batch)?;
        }
        if let Some(quantity) = patch.quantity {
            validate_stock(quantity)?;
        }

        let mut product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        if patch.is_empty() {
            return Ok(product);
        }

        patch.apply(&mut product);
        product.updated_at = Utc::now();

        debug!(id = %product.id, "Updating product");

        sqlx::query(
            "UPDATE products SET
                 name = ?2, quantity = ?3, pack_size = ?4, gst_percent = ?5,
                 expire = ?6, batch = ?7, mrp = ?8, unit = ?9, updated_at = ?10
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.pack_size)
        .bind(product.gst_percent)
        .bind(product.expire)
        .bind(&product.batch)
        .bind(product.mrp)
        .bind(&product.unit)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Adjusts stock by a relative delta (negative for dispensing,
    /// positive for restocking).
    ///
    /// Billing deliberately does NOT call this; stock management is an
    /// explicit, separate operation. The relative `quantity + delta`
    /// form stays safe under concurrent adjustments.
    pub async fn adjust_quantity(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting product quantity");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products
             SET quantity = quantity + ?2, updated_at = ?3
             WHERE id = ?1",
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product. Bills that sold it keep their line items; only
    /// the live inventory row goes away.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

/// Escapes LIKE wildcards in user input so a query containing `%` or `_`
/// matches literally.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use kirana_core::{NewStore, NewUser};

    async fn setup_with_store() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .create(NewUser {
                name: "Asha Patel".to_string(),
                phone: "9876543210".to_string(),
                email: None,
                password_hash: "$argon2id$v=19$test".to_string(),
                addr: None,
                gst_no: None,
            })
            .await
            .unwrap();
        let store = db
            .stores()
            .create(NewStore {
                user_id: user.id,
                name: "Sharma Medicos".to_string(),
                owner_name: "R. Sharma".to_string(),
                email: None,
                phone: None,
                addr: None,
                gst_no: None,
            })
            .await
            .unwrap();
        (db, store.id)
    }

    async fn add_product(db: &Database, store_id: &str, name: &str, batch: Option<&str>) -> Product {
        db.products()
            .create(NewProduct {
                store_id: store_id.to_string(),
                name: name.to_string(),
                quantity: Some(10),
                pack_size: None,
                gst_percent: 12,
                expire: None,
                batch: batch.map(|b| b.to_string()),
                mrp: 25.0,
                unit: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let (db, store_id) = setup_with_store().await;

        let product = db
            .products()
            .create(NewProduct {
                store_id: store_id.clone(),
                name: "Dolo 650".to_string(),
                quantity: None,
                pack_size: None,
                gst_percent: 12,
                expire: None,
                batch: None,
                mrp: 30.0,
                unit: None,
            })
            .await
            .unwrap();

        assert_eq!(product.quantity, 0);
        assert_eq!(product.unit, "units");
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (db, store_id) = setup_with_store().await;

        let bad_batch = db
            .products()
            .create(NewProduct {
                store_id: store_id.clone(),
                name: "Dolo 650".to_string(),
                quantity: None,
                pack_size: None,
                gst_percent: 12,
                expire: None,
                batch: Some("WAY-TOO-LONG-BATCH".to_string()),
                mrp: 30.0,
                unit: None,
            })
            .await;
        assert!(matches!(bad_batch, Err(DbError::Validation(_))));

        let bad_mrp = db
            .products()
            .create(NewProduct {
                store_id,
                name: "Dolo 650".to_string(),
                quantity: None,
                pack_size: None,
                gst_percent: 12,
                expire: None,
                batch: None,
                mrp: -1.0,
                unit: None,
            })
            .await;
        assert!(matches!(bad_mrp, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_substring_search_matches_name_and_batch() {
        let (db, store_id) = setup_with_store().await;
        add_product(&db, &store_id, "DOLO 650", Some("D650A")).await;
        add_product(&db, &store_id, "Crocin Advance", Some("CRA11")).await;

        // case-insensitive name match
        let by_name = db.products().search(&store_id, "dolo").await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "DOLO 650");

        // batch substring match
        let by_batch = db.products().search(&store_id, "ra1").await.unwrap();
        assert_eq!(by_batch.len(), 1);
        assert_eq!(by_batch[0].name, "Crocin Advance");

        // wildcard characters match literally, not as patterns
        let literal = db.products().search(&store_id, "%").await.unwrap();
        assert!(literal.is_empty());
    }

    #[tokio::test]
    async fn test_substring_search_is_bounded_to_five() {
        let (db, store_id) = setup_with_store().await;
        for i in 0..7 {
            add_product(&db, &store_id, &format!("Vitamin B{i}"), None).await;
        }

        let hits = db.products().search(&store_id, "vitamin").await.unwrap();
        assert_eq!(hits.len(), 5);
    }

    #[tokio::test]
    async fn test_search_is_store_scoped() {
        let (db, store_a) = setup_with_store().await;

        // a second tenant with identically named inventory
        let other_user = db
            .users()
            .create(NewUser {
                name: "Vikram Rao".to_string(),
                phone: "9123456780".to_string(),
                email: None,
                password_hash: "$argon2id$v=19$test".to_string(),
                addr: None,
                gst_no: None,
            })
            .await
            .unwrap();
        let store_b = db
            .stores()
            .create(NewStore {
                user_id: other_user.id,
                name: "Rao Pharma".to_string(),
                owner_name: "V. Rao".to_string(),
                email: None,
                phone: None,
                addr: None,
                gst_no: None,
            })
            .await
            .unwrap();

        add_product(&db, &store_a, "Dolo 650", None).await;
        add_product(&db, &store_b.id, "Dolo 650", None).await;

        for hits in [
            db.products().search(&store_a, "dolo").await.unwrap(),
            db.products().full_search(&store_a, "dolo").await.unwrap(),
        ] {
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].store_id, store_a);
        }
    }

    #[tokio::test]
    async fn test_empty_query_and_unknown_store_return_nothing() {
        let (db, store_id) = setup_with_store().await;
        add_product(&db, &store_id, "Dolo 650", None).await;

        assert!(db.products().search(&store_id, "").await.unwrap().is_empty());
        assert!(db.products().search(&store_id, "   ").await.unwrap().is_empty());
        assert!(db.products().full_search(&store_id, "").await.unwrap().is_empty());

        assert!(db.products().search("no-such-store", "dolo").await.unwrap().is_empty());
        assert!(db
            .products()
            .full_search("no-such-store", "dolo")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_fuzzy_search_threshold_and_ranking() {
        let (db, store_id) = setup_with_store().await;
        add_product(&db, &store_id, "Dolo 650", None).await;
        add_product(&db, &store_id, "Dolo", None).await;
        add_product(&db, &store_id, "Dolopar 325", None).await;
        add_product(&db, &store_id, "Zincovit", None).await;

        let hits = db.products().full_search(&store_id, "dolo").await.unwrap();

        // Zincovit scores ~0 and stays out; the rest rank by similarity
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Dolo", "Dolo 650", "Dolopar 325"]);
    }

    #[tokio::test]
    async fn test_fuzzy_search_ranks_by_batch_when_stronger() {
        let (db, store_id) = setup_with_store().await;
        add_product(&db, &store_id, "Amoxicillin 500", Some("AMX21")).await;
        add_product(&db, &store_id, "Azithromycin 250", Some("AZ500")).await;

        // the query is a batch code, not a name
        let hits = db.products().full_search(&store_id, "AMX21").await.unwrap();
        assert!(!hits.is_empty());
        assert_eq!(hits[0].batch.as_deref(), Some("AMX21"));
    }

    #[tokio::test]
    async fn test_patch_update_and_clear_batch() {
        let (db, store_id) = setup_with_store().await;
        let product = add_product(&db, &store_id, "Dolo 650", Some("D650A")).await;

        let patch = ProductPatch {
            mrp: Some(32.5),
            batch: Some(None),
            ..Default::default()
        };
        let updated = db.products().update(&product.id, &patch).await.unwrap();

        assert_eq!(updated.mrp, 32.5);
        assert_eq!(updated.batch, None);
        assert_eq!(updated.name, "Dolo 650");

        let reloaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(reloaded.batch, None);
        assert_eq!(reloaded.mrp, 32.5);
    }

    #[tokio::test]
    async fn test_adjust_quantity_is_relative() {
        let (db, store_id) = setup_with_store().await;
        let product = add_product(&db, &store_id, "Dolo 650", None).await;
        assert_eq!(product.quantity, 10);

        db.products().adjust_quantity(&product.id, -3).await.unwrap();
        db.products().adjust_quantity(&product.id, 5).await.unwrap();

        let reloaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(reloaded.quantity, 12);

        let missing = db.products().adjust_quantity("no-such-id", 1).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }
}
