//! # Domain Types
//!
//! Core domain types used throughout Kirana POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  User ──owns──► Store ──owns──► Product                             │
//! │                   │                                                 │
//! │                   └────owns──► Bill ──owns──► BillItem              │
//! │                                 ▲                  │                │
//! │                                 │                  └─ references    │
//! │                         snapshots store               one Product   │
//! │                         identity fields               (by id only)  │
//! │                                                                     │
//! │  Deletion cascades follow the "owns" edges, never the reference.    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Patch Pattern
//! Partial updates go through explicit patch structs with one optional
//! field per mutable column. `None` leaves a column unchanged; for
//! nullable columns the inner option distinguishes "set" from "clear".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::billing;

// =============================================================================
// User
// =============================================================================

/// An account owner. Owns zero or more stores.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login identity; unique across all users.
    pub phone: String,

    /// Optional contact email; unique when present.
    pub email: Option<String>,

    /// Argon2 PHC hash of the password. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Postal address.
    pub addr: Option<String>,

    /// Tax registration number.
    pub gst_no: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user. The caller supplies an already-hashed
/// password (see `kirana_db::auth`).
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub addr: Option<String>,
    pub gst_no: Option<String>,
}

/// Partial update for a user.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// `Some(None)` clears the email.
    pub email: Option<Option<String>>,
    pub addr: Option<Option<String>>,
    pub gst_no: Option<Option<String>>,
}

impl UserPatch {
    /// Applies the patch field-by-field, leaving `None` fields untouched.
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(addr) = &self.addr {
            user.addr = addr.clone();
        }
        if let Some(gst_no) = &self.gst_no {
            user.gst_no = gst_no.clone();
        }
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.addr.is_none()
            && self.gst_no.is_none()
    }
}

// =============================================================================
// Store
// =============================================================================

/// A single business location, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Store {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user.
    pub user_id: String,

    /// Store display name.
    pub name: String,

    /// Proprietor name printed on bills.
    pub owner_name: String,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub addr: Option<String>,

    /// Store tax registration number.
    pub gst_no: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a store.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewStore {
    pub user_id: String,
    pub name: String,
    pub owner_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub addr: Option<String>,
    pub gst_no: Option<String>,
}

/// Partial update for a store.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct StorePatch {
    pub name: Option<String>,
    pub owner_name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub addr: Option<Option<String>>,
    pub gst_no: Option<Option<String>>,
}

impl StorePatch {
    /// Applies the patch field-by-field, leaving `None` fields untouched.
    pub fn apply(&self, store: &mut Store) {
        if let Some(name) = &self.name {
            store.name = name.clone();
        }
        if let Some(owner_name) = &self.owner_name {
            store.owner_name = owner_name.clone();
        }
        if let Some(email) = &self.email {
            store.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            store.phone = phone.clone();
        }
        if let Some(addr) = &self.addr {
            store.addr = addr.clone();
        }
        if let Some(gst_no) = &self.gst_no {
            store.gst_no = gst_no.clone();
        }
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.owner_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.addr.is_none()
            && self.gst_no.is_none()
    }
}

/// A store plus its inventory size, for dashboard listings.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct StoreSummary {
    pub store: Store,
    pub total_products: i64,
}

// =============================================================================
// Product
// =============================================================================

/// An inventory row belonging to one store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning store.
    pub store_id: String,

    /// Display name; one of the two fuzzy-search fields.
    pub name: String,

    /// Units currently on hand.
    pub quantity: i64,

    /// Default pack size for dispensing, when the product has one.
    pub pack_size: Option<i64>,

    /// GST rate charged on this product, whole percent.
    pub gst_percent: i64,

    /// Expiry timestamp, when tracked.
    #[ts(as = "Option<String>")]
    pub expire: Option<DateTime<Utc>>,

    /// Manufacturer batch code (≤ 12 chars); the other fuzzy-search field.
    pub batch: Option<String>,

    /// Maximum retail price per unit.
    pub mrp: f64,

    /// Quantity unit label ("units", "strips", "ml", ...).
    pub unit: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub store_id: String,
    pub name: String,
    /// Defaults to 0.
    pub quantity: Option<i64>,
    pub pack_size: Option<i64>,
    pub gst_percent: i64,
    #[ts(as = "Option<String>")]
    pub expire: Option<DateTime<Utc>>,
    pub batch: Option<String>,
    pub mrp: f64,
    /// Defaults to [`crate::DEFAULT_UNIT`].
    pub unit: Option<String>,
}

/// Partial update for a product.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub pack_size: Option<Option<i64>>,
    pub gst_percent: Option<i64>,
    #[ts(as = "Option<Option<String>>")]
    pub expire: Option<Option<DateTime<Utc>>>,
    pub batch: Option<Option<String>>,
    pub mrp: Option<f64>,
    pub unit: Option<String>,
}

impl ProductPatch {
    /// Applies the patch field-by-field, leaving `None` fields untouched.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(pack_size) = self.pack_size {
            product.pack_size = pack_size;
        }
        if let Some(gst_percent) = self.gst_percent {
            product.gst_percent = gst_percent;
        }
        if let Some(expire) = self.expire {
            product.expire = expire;
        }
        if let Some(batch) = &self.batch {
            product.batch = batch.clone();
        }
        if let Some(mrp) = self.mrp {
            product.mrp = mrp;
        }
        if let Some(unit) = &self.unit {
            product.unit = unit.clone();
        }
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.pack_size.is_none()
            && self.gst_percent.is_none()
            && self.expire.is_none()
            && self.batch.is_none()
            && self.mrp.is_none()
            && self.unit.is_none()
    }
}

// =============================================================================
// Bill
// =============================================================================

/// An immutable checkout record.
///
/// Store identity fields are snapshotted at creation time so historical
/// bills stay accurate even if the store record is later edited. There is
/// no update operation for bills; they exist as a permanent audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Bill {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning store.
    pub store_id: String,

    pub customer_name: Option<String>,
    pub doctor_name: Option<String>,

    /// When the sale happened; defaults to creation time.
    #[ts(as = "String")]
    pub billing_date: DateTime<Utc>,

    /// Store name at billing time (frozen).
    pub store_name: String,

    /// Proprietor name at billing time (frozen).
    pub owner_name: String,

    /// Store tax ID at billing time (frozen).
    pub store_gst_no: Option<String>,

    /// Store address at billing time (frozen).
    pub store_addr: Option<String>,

    /// Store phone at billing time (frozen).
    pub store_phone: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A line item on a bill.
///
/// Joins the bill to the product it sold, plus the transaction-specific
/// quantity, discount, GST rate and computed total.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning bill.
    pub bill_id: String,

    /// Product sold. Informational reference: the row survives product
    /// deletion, the id just stops resolving.
    pub product_id: String,

    /// Units sold.
    pub quantity: i64,

    /// Percentage discount applied before GST.
    pub discount_percent: f64,

    /// GST rate applied after the discount.
    pub gst_percent: f64,

    /// Final line price, rounded to 2 decimals at creation.
    pub total_price: f64,
}

/// One requested line of a bill-creation call.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct BillLine {
    pub product_id: String,
    pub quantity: i64,
    /// Defaults to 0. The caller's UI usually prefills this.
    pub discount_percent: Option<f64>,
    /// Defaults to 0. The caller's UI usually prefills the product's rate.
    pub gst_percent: Option<f64>,
}

/// Input for creating a bill together with all of its items.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewBill {
    pub store_id: String,
    pub customer_name: Option<String>,
    pub doctor_name: Option<String>,
    /// Defaults to now.
    #[ts(as = "Option<String>")]
    pub billing_date: Option<DateTime<Utc>>,
    pub items: Vec<BillLine>,
}

/// A bill with its line items loaded.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct BillWithItems {
    pub bill: Bill,
    pub items: Vec<BillItem>,
}

impl BillWithItems {
    /// Display total: sum of the item totals. Derived, never stored.
    pub fn total(&self) -> f64 {
        billing::bill_total(self.items.iter().map(|i| i.total_price))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
