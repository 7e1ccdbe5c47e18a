//! # Stock Annotation
//!
//! Pure logic for the "menu with stock" view: given a menu item's recipe and
//! the current inventory levels, classify every ingredient and decide whether
//! the item can be ordered right now.
//!
//! ## Ingredient Classification
//! ```text
//! stock missing        → NotFound      (recipe points at a deleted row)
//! stock == 0           → OutOfStock
//! stock <= threshold   → LowStock
//! otherwise            → InStock
//! ```
//!
//! An item is orderable when one unit of it could be deducted: every
//! ingredient exists and has at least the per-unit recipe quantity on hand.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::MenuItem;

// =============================================================================
// Stock Status
// =============================================================================

/// Availability class of a single ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "in stock")]
    InStock,
    #[serde(rename = "low stock")]
    LowStock,
    #[serde(rename = "out of stock")]
    OutOfStock,
    /// Recipe references an inventory item that no longer exists.
    #[serde(rename = "not found")]
    NotFound,
}

// =============================================================================
// Report Types
// =============================================================================

/// One recipe ingredient annotated with current availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientStock {
    pub inventory_item: String,
    /// Units needed per single item sold.
    pub required: i64,
    /// Units currently on hand. Zero when the row is missing.
    pub available: i64,
    pub status: StockStatus,
}

/// Stock report for one menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub ingredients: Vec<IngredientStock>,
    /// True when one unit could be deducted right now.
    pub can_be_ordered: bool,
    pub has_out_of_stock: bool,
    pub has_low_stock: bool,
}

// =============================================================================
// Annotation
// =============================================================================

/// Classifies a single stock level against the low-stock threshold.
pub fn classify(stock: Option<i64>, threshold: i64) -> StockStatus {
    match stock {
        None => StockStatus::NotFound,
        Some(0) => StockStatus::OutOfStock,
        Some(s) if s <= threshold => StockStatus::LowStock,
        Some(_) => StockStatus::InStock,
    }
}

/// Builds the stock report for one menu item.
///
/// `stock_levels` maps inventory item name to current stock; absent keys are
/// treated as deleted inventory rows.
pub fn annotate(item: &MenuItem, stock_levels: &HashMap<String, i64>, threshold: i64) -> StockReport {
    let ingredients: Vec<IngredientStock> = item
        .ingredients
        .iter()
        .map(|line| {
            let stock = stock_levels.get(&line.inventory_item).copied();
            IngredientStock {
                inventory_item: line.inventory_item.clone(),
                required: line.quantity,
                available: stock.unwrap_or(0),
                status: classify(stock, threshold),
            }
        })
        .collect();

    let can_be_ordered = ingredients
        .iter()
        .all(|i| i.status != StockStatus::NotFound && i.available >= i.required);
    let has_out_of_stock = ingredients
        .iter()
        .any(|i| matches!(i.status, StockStatus::OutOfStock | StockStatus::NotFound));
    let has_low_stock = ingredients.iter().any(|i| i.status == StockStatus::LowStock);

    StockReport {
        ingredients,
        can_be_ordered,
        has_out_of_stock,
        has_low_stock,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeIngredient;
    use chrono::Utc;

    fn item(recipe: &[(&str, i64)]) -> MenuItem {
        MenuItem {
            id: "menu-1".to_string(),
            name: "Tonkotsu Ramen".to_string(),
            price_cents: 25000,
            category: "ramen".to_string(),
            image: None,
            ingredients: recipe
                .iter()
                .map(|(ing, qty)| RecipeIngredient {
                    inventory_item: ing.to_string(),
                    quantity: *qty,
                })
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn levels(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(None, 10), StockStatus::NotFound);
        assert_eq!(classify(Some(0), 10), StockStatus::OutOfStock);
        assert_eq!(classify(Some(10), 10), StockStatus::LowStock);
        assert_eq!(classify(Some(11), 10), StockStatus::InStock);
    }

    #[test]
    fn test_fully_stocked_item_is_orderable() {
        let report = annotate(
            &item(&[("Noodles", 2), ("Broth", 1)]),
            &levels(&[("Noodles", 50), ("Broth", 30)]),
            10,
        );
        assert!(report.can_be_ordered);
        assert!(!report.has_out_of_stock);
        assert!(!report.has_low_stock);
    }

    #[test]
    fn test_low_stock_still_orderable() {
        let report = annotate(
            &item(&[("Noodles", 2)]),
            &levels(&[("Noodles", 5)]),
            10,
        );
        assert!(report.can_be_ordered);
        assert!(report.has_low_stock);
        assert_eq!(report.ingredients[0].status, StockStatus::LowStock);
    }

    #[test]
    fn test_insufficient_for_one_unit_blocks_ordering() {
        // Stock exists but is below the per-unit recipe amount.
        let report = annotate(
            &item(&[("Noodles", 2)]),
            &levels(&[("Noodles", 1)]),
            10,
        );
        assert!(!report.can_be_ordered);
        assert_eq!(report.ingredients[0].status, StockStatus::LowStock);
    }

    #[test]
    fn test_missing_inventory_row_reported_not_found() {
        let report = annotate(&item(&[("Chashu", 1)]), &levels(&[]), 10);
        assert!(!report.can_be_ordered);
        assert!(report.has_out_of_stock);
        assert_eq!(report.ingredients[0].status, StockStatus::NotFound);
        assert_eq!(report.ingredients[0].available, 0);
    }

    #[test]
    fn test_stock_status_wire_strings() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out of stock\"");
    }
}
