//! # kirana-db: Database Layer for Kirana POS
//!
//! Persistence for the Kirana POS backend: SQLite via sqlx with embedded
//! migrations, plus the ephemeral token/OTP side store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Kirana POS Data Flow                           │
//! │                                                                     │
//! │  Web/UI harness (search_products, create_bill, ...)                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   kirana-db (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌─────────────────────┐ │   │
//! │  │  │  Database  │  │ Repositories │  │ TokenStore (side KV)│ │   │
//! │  │  │ (pool.rs)  │◄─│ user, store, │  │ publish tokens, OTP │ │   │
//! │  │  │ SqlitePool │  │ product, bill│  │ own SQLite handle   │ │   │
//! │  │  └────────────┘  └──────────────┘  └─────────────────────┘ │   │
//! │  │                                                             │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite (WAL mode, foreign keys ON)                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (user, store, product, bill)
//! - [`auth`] - Password hashing helpers for the auth collaborator
//! - [`token_store`] - Ephemeral publish-token / OTP store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kirana_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/kirana.db")).await?;
//!
//! let hits = db.products().full_search(&store_id, "paracetmol").await?;
//! let bill = db.bills().create(new_bill).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod token_store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use token_store::TokenStore;

// Repository re-exports for convenience
pub use repository::bill::BillRepository;
pub use repository::product::ProductRepository;
pub use repository::store::StoreRepository;
pub use repository::user::UserRepository;
