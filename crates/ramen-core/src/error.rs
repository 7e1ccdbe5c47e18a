//! # Error Types
//!
//! Domain-specific error types for ramen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ramen-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ramen-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── CheckoutError    - CoreError | DbError during checkout            │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What clients see (status code + message)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → ApiError → Client │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ingredient name, quantities, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. During checkout they all
/// mean the same thing operationally: abort, roll back, deduct nothing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item cannot be found.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// A recipe references an inventory item that does not exist.
    ///
    /// ## When This Occurs
    /// - Recipe was authored against an inventory row that was later deleted
    /// - Ingredient name typo in the recipe (join is by name)
    #[error("Ingredient not found in inventory: {0}")]
    IngredientNotFound(String),

    /// Not enough stock to cover the computed demand for one ingredient.
    ///
    /// ## Checkout Flow
    /// ```text
    /// Resolve recipe: Chashu x1 per Extra Chashu
    ///      │
    ///      ▼
    /// Conditional deduct: stock=0, required=1
    ///      │
    ///      ▼
    /// InsufficientStock { ingredient: "Chashu", available: 0, required: 1 }
    ///      │
    ///      ▼
    /// Whole checkout rolls back; no ingredient is touched
    /// ```
    #[error("Insufficient stock for {ingredient}. Available: {available}, Required: {required}")]
    InsufficientStock {
        ingredient: String,
        available: i64,
        required: i64,
    },

    /// An item listed under `addOns` is not in the add-on category.
    #[error("Menu item {0} is not an add-on")]
    NotAnAddOn(String),

    /// A removal names an ingredient the base recipe does not contain.
    ///
    /// Removals only ever subtract from the base item's recipe; add-on
    /// recipes are not touched by them.
    #[error("Ingredient {0} is not part of this menu item's recipe")]
    RemovalNotInRecipe(String),

    /// A removal asks for more units than the recipe uses.
    #[error("Cannot remove more {ingredient} than what's in the menu item")]
    RemovalExceedsRecipe {
        ingredient: String,
        in_recipe: i64,
        requested: i64,
    },

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// No active order (POS or mobile) carries the given order code.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID, unparseable number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate inventory item name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            ingredient: "Chashu".to_string(),
            available: 0,
            required: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Chashu. Available: 0, Required: 1"
        );

        let err = CoreError::RemovalExceedsRecipe {
            ingredient: "Broth".to_string(),
            in_recipe: 1,
            requested: 2,
        };
        assert_eq!(
            err.to_string(),
            "Cannot remove more Broth than what's in the menu item"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "menuItemId".to_string(),
        };
        assert_eq!(err.to_string(), "menuItemId is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "paymentMethod".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
