//! # ramen-core: Pure Business Logic for Ramen POS
//!
//! This crate is the **heart** of Ramen POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ramen POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    REST API (apps/api)                          │   │
//! │  │    POST /sales ─► GET /kitchen/orders ─► GET /menu/with-stock   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ramen-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │  recipe   │  │ validation│   │   │
//! │  │   │ MenuItem  │  │   Money   │  │ Resolver  │  │   rules   │   │   │
//! │  │   │   Sale    │  │ centavos  │  │  demand   │  │  checks   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ramen-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, checkout transaction         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Sale, MobileOrder, OrderView, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`recipe`] - Recipe Resolver: cart lines to net ingredient demand
//! - [`stock`] - Stock-status annotation for the menu/with-stock projection
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod recipe;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use ramen_core::Money` instead of
// `use ramen_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use recipe::{resolve_demand, validate_removals, IngredientDemand};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Menu category reserved for add-on items.
///
/// ## Why a string constant?
/// Menu categories are open-ended (ramen, sides, drinks, ...) and created by
/// admins at will; only this one value carries behavior. Keeping the category
/// a plain string mirrors how recipes join inventory by name.
pub const ADD_ON_CATEGORY: &str = "add-ons";

/// Width of the human-facing order code ("0001", "0042", ...).
pub const ORDER_CODE_WIDTH: usize = 4;

/// Default low-stock threshold when no configuration is supplied.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Formats a sequence number as a human-facing order code.
///
/// ## Example
/// ```rust
/// assert_eq!(ramen_core::format_order_code(7), "0007");
/// assert_eq!(ramen_core::format_order_code(12345), "12345");
/// ```
pub fn format_order_code(seq: i64) -> String {
    format!("{:0width$}", seq, width = ORDER_CODE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_order_code_pads_to_four_digits() {
        assert_eq!(format_order_code(1), "0001");
        assert_eq!(format_order_code(999), "0999");
        assert_eq!(format_order_code(1000), "1000");
        // Codes past 9999 keep growing rather than wrapping
        assert_eq!(format_order_code(10001), "10001");
    }
}
