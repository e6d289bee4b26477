//! # Bill Repository
//!
//! Atomic bill creation and immutable bill reads.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Bill Creation (one transaction)                 │
//! │                                                                     │
//! │  BEGIN                                                              │
//! │    │                                                                │
//! │    ├── load store ──────────── missing? → NotFound, ROLLBACK        │
//! │    │     └── snapshot name/owner/gst/addr/phone into the bill       │
//! │    │                                                                │
//! │    ├── INSERT bill row                                              │
//! │    │                                                                │
//! │    ├── for each line:                                               │
//! │    │     load product (store-scoped) ── missing? → NotFound,        │
//! │    │     compute total_price            ROLLBACK (no partial bill)  │
//! │    │     INSERT bill_items row                                      │
//! │    │                                                                │
//! │  COMMIT                                                             │
//! │                                                                     │
//! │  Product.quantity is never touched here; stock management is        │
//! │  a separate explicit operation on the product repository.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bills have no update or delete operations: they are the audit trail.
//! The only way a bill disappears is the cascade from its store.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::billing::line_total;
use kirana_core::validation::{validate_percent, validate_quantity};
use kirana_core::{Bill, BillItem, BillWithItems, NewBill, Product, Store, ValidationError};

const BILL_COLUMNS: &str = "id, store_id, customer_name, doctor_name, billing_date, \
                            store_name, owner_name, store_gst_no, store_addr, store_phone, \
                            created_at";

const ITEM_COLUMNS: &str =
    "id, bill_id, product_id, quantity, discount_percent, gst_percent, total_price";

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Creates a bill and all of its items as one atomic unit.
    ///
    /// ## Behavior
    /// - Store identity fields are snapshotted exactly once, here.
    /// - Each line's `total_price` is
    ///   `round2(mrp × qty × (1 − discount/100) × (1 + gst/100))`.
    /// - Any missing product (or store) rolls the whole operation back:
    ///   after a failure, zero bill rows and zero item rows exist.
    ///
    /// ## Returns
    /// * `Err(DbError::Validation)` - Empty item list or out-of-range input
    /// * `Err(DbError::NotFound)` - Unknown store, or a line referencing a
    ///   product that doesn't exist in this store
    pub async fn create(&self, new_bill: NewBill) -> DbResult<BillWithItems> {
        if new_bill.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }
        for line in &new_bill.items {
            validate_quantity(line.quantity)?;
            if let Some(discount) = line.discount_percent {
                validate_percent("discount_percent", discount)?;
            }
            if let Some(gst) = line.gst_percent {
                validate_percent("gst_percent", gst)?;
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let store = sqlx::query_as::<_, Store>(
            "SELECT id, user_id, name, owner_name, email, phone, addr, gst_no,
                    created_at, updated_at
             FROM stores WHERE id = ?1",
        )
        .bind(&new_bill.store_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Store", &new_bill.store_id))?;

        let now = Utc::now();
        let bill = Bill {
            id: Uuid::new_v4().to_string(),
            store_id: store.id.clone(),
            customer_name: new_bill.customer_name,
            doctor_name: new_bill.doctor_name,
            billing_date: new_bill.billing_date.unwrap_or(now),
            // snapshot: frozen now, never refreshed
            store_name: store.name.clone(),
            owner_name: store.owner_name.clone(),
            store_gst_no: store.gst_no.clone(),
            store_addr: store.addr.clone(),
            store_phone: store.phone.clone(),
            created_at: now,
        };

        debug!(id = %bill.id, store_id = %bill.store_id, lines = new_bill.items.len(), "Creating bill");

        sqlx::query(
            "INSERT INTO bills (id, store_id, customer_name, doctor_name, billing_date,
                                store_name, owner_name, store_gst_no, store_addr, store_phone,
                                created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&bill.id)
        .bind(&bill.store_id)
        .bind(&bill.customer_name)
        .bind(&bill.doctor_name)
        .bind(bill.billing_date)
        .bind(&bill.store_name)
        .bind(&bill.owner_name)
        .bind(&bill.store_gst_no)
        .bind(&bill.store_addr)
        .bind(&bill.store_phone)
        .bind(bill.created_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new_bill.items.len());
        for line in new_bill.items {
            // store-scoped lookup: a bill can only sell this store's inventory
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, store_id, name, quantity, pack_size, gst_percent, expire,
                        batch, mrp, unit, created_at, updated_at
                 FROM products WHERE id = ?1 AND store_id = ?2",
            )
            .bind(&line.product_id)
            .bind(&store.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Product", &line.product_id))?;

            let discount_percent = line.discount_percent.unwrap_or(0.0);
            let gst_percent = line.gst_percent.unwrap_or(0.0);

            let item = BillItem {
                id: Uuid::new_v4().to_string(),
                bill_id: bill.id.clone(),
                product_id: line.product_id,
                quantity: line.quantity,
                discount_percent,
                gst_percent,
                total_price: line_total(product.mrp, line.quantity, discount_percent, gst_percent),
            };

            sqlx::query(
                "INSERT INTO bill_items (id, bill_id, product_id, quantity,
                                         discount_percent, gst_percent, total_price)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&item.id)
            .bind(&item.bill_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.discount_percent)
            .bind(item.gst_percent)
            .bind(item.total_price)
            .execute(&mut *tx)
            .await?;

            items.push(item);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(BillWithItems { bill, items })
    }

    /// Gets a bill with its items.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<BillWithItems>> {
        let bill = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(bill) = bill else {
            return Ok(None);
        };

        let items = self.items(&bill.id).await?;
        Ok(Some(BillWithItems { bill, items }))
    }

    /// Gets the line items of a bill, in insertion order.
    pub async fn items(&self, bill_id: &str) -> DbResult<Vec<BillItem>> {
        let items = sqlx::query_as::<_, BillItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM bill_items WHERE bill_id = ?1 ORDER BY rowid"
        ))
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a store's bills, newest billing date first.
    pub async fn list_by_store(&self, store_id: &str) -> DbResult<Vec<Bill>> {
        let bills = sqlx::query_as::<_, Bill>(&format!(
            "SELECT {BILL_COLUMNS} FROM bills
             WHERE store_id = ?1
             ORDER BY billing_date DESC"
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bills)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
