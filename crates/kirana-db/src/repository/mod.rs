//! # Repository Module
//!
//! Database repository implementations for Kirana POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Repository Pattern                             │
//! │                                                                     │
//! │  Web/UI harness                                                     │
//! │       │                                                             │
//! │       │  db.products().full_search(&store_id, "paracetmol")         │
//! │       ▼                                                             │
//! │  ProductRepository                                                  │
//! │  ├── search(&self, store_id, query)                                 │
//! │  ├── full_search(&self, store_id, query)                            │
//! │  ├── create / get_by_id / update / delete                           │
//! │       │                                                             │
//! │       │  SQL                                                        │
//! │       ▼                                                             │
//! │  SQLite database                                                    │
//! │                                                                     │
//! │  SQL stays in one place; business math stays in kirana-core.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Account CRUD, phone lookup
//! - [`store::StoreRepository`] - Store CRUD, listings, summaries
//! - [`product::ProductRepository`] - Inventory CRUD and both search paths
//! - [`bill::BillRepository`] - Atomic bill creation, loads, listings

pub mod bill;
pub mod product;
pub mod store;
pub mod user;
