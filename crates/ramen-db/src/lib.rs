//! # ramen-db: Database Layer for Ramen POS
//!
//! This crate provides database access for the Ramen POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ramen POS Data Flow                              │
//! │                                                                         │
//! │  HTTP Handler (POST /sales)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ramen-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (menu, ...)  │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────────────┐    ┌───────────────────────────┐  │   │
//! │  │   │    CheckoutEngine     │    │    KitchenProjector       │  │   │
//! │  │   │  (one transaction:    │    │  (merge sales + mobile    │  │   │
//! │  │   │   code + stock +      │    │   into one queue)         │  │   │
//! │  │   │   sale insert)        │    │                           │  │   │
//! │  │   └───────────────────────┘    └───────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and checkout error types
//! - [`repository`] - Single-table repositories (menu, inventory, sale, mobile)
//! - [`checkout`] - The checkout transaction (order code + deductions + sale)
//! - [`kitchen`] - Kitchen queue projection and status routing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ramen_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/ramen.db")).await?;
//! let sale = db.checkout().checkout(request).await?;
//! let queue = db.kitchen().active_orders().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod kitchen;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CheckoutAddOn, CheckoutEngine, CheckoutRequest};
pub use error::{CheckoutError, DbError};
pub use kitchen::KitchenProjector;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::menu::{MenuRepository, NewMenuItem};
pub use repository::mobile_order::{MobileOrderRepository, NewMobileOrder};
pub use repository::sale::SaleRepository;
