//! # Repository Module
//!
//! Database repository implementations for Ramen POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.menu().get_by_id(id)                                        │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  MenuRepository                                                        │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, item)                                               │
//! │  └── update(&self, item)                                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • JSON column decoding happens once, at the row boundary              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`menu::MenuRepository`] - Menu item CRUD, category queries
//! - [`inventory::InventoryRepository`] - Stock ledger reads and admin writes
//! - [`sale::SaleRepository`] - Sale reads and status updates
//! - [`mobile_order::MobileOrderRepository`] - Mobile channel orders
//!
//! Checkout and the kitchen projection have their own modules
//! ([`crate::checkout`], [`crate::kitchen`]): they span multiple tables and
//! don't fit the one-table repository shape.

pub mod inventory;
pub mod menu;
pub mod mobile_order;
pub mod sale;
