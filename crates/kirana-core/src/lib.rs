//! # kirana-core: Pure Business Logic for Kirana POS
//!
//! This crate is the heart of Kirana POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Kirana POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  Web/UI Harness (external)                  │   │
//! │  │    Auth ──► Store Dashboard ──► Inventory ──► Billing UI    │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │ in-process calls                   │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │               ★ kirana-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │  ┌──────────┐ ┌────────────┐ ┌─────────┐ ┌────────────┐    │   │
//! │  │  │  types   │ │ similarity │ │ billing │ │ validation │    │   │
//! │  │  │ Product  │ │  trigrams  │ │ totals  │ │   rules    │    │   │
//! │  │  │  Bill    │ │  ranking   │ │ rounding│ │   checks   │    │   │
//! │  │  └──────────┘ └────────────┘ └─────────┘ └────────────┘    │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                    │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                  kirana-db (Database Layer)                 │   │
//! │  │          SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Store, Product, Bill, BillItem)
//! - [`similarity`] - Trigram string similarity for fuzzy product search
//! - [`billing`] - Line-item and bill total arithmetic
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod similarity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of rows returned by the exact/substring product search.
///
/// Bounds the cost of pathological wildcard queries; the fuzzy path is the
/// one that returns full ranked result sets.
pub const SEARCH_RESULT_LIMIT: u32 = 5;

/// Minimum trigram similarity for a product to qualify in fuzzy search.
///
/// A product matches when `max(sim(query, name), sim(query, batch))`
/// exceeds this value.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Maximum length of a product batch code.
pub const MAX_BATCH_LEN: usize = 12;

/// Quantity unit assigned to products that don't specify one.
pub const DEFAULT_UNIT: &str = "units";
