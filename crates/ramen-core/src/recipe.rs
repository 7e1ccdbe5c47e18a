//! # Recipe Resolver
//!
//! Turns a cart line (menu item + quantity + removals + add-ons) into the
//! exact per-ingredient stock demand a checkout must deduct.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Recipe Resolution                                 │
//! │                                                                         │
//! │  Base item (qty Q)                Add-on (qty A)                        │
//! │  ┌─────────────────┐              ┌─────────────────┐                   │
//! │  │ recipe line r   │              │ recipe line r   │                   │
//! │  │ removal     m   │              │ (no removals)   │                   │
//! │  └────────┬────────┘              └────────┬────────┘                   │
//! │           │                                │                            │
//! │           ▼                                ▼                            │
//! │  net = max(0, r - m) * Q          net = r * A                           │
//! │           │                                │                            │
//! │           └──────────┬─────────────────────┘                            │
//! │                      ▼                                                  │
//! │        merge by ingredient name (sum)                                   │
//! │                      ▼                                                  │
//! │        drop zero-demand ingredients                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Removals apply to the **base** recipe only, never to add-on recipes.
//! - A removal is clamped at zero: removing everything an item uses of an
//!   ingredient means that ingredient is simply not deducted.
//! - Removals never change price; they only reduce demand.
//! - Add-ons resolve their own full recipe, scaled by the add-on quantity
//!   (not by the base item quantity).

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::types::{MenuItem, RemovedIngredient};

// =============================================================================
// Ingredient Demand
// =============================================================================

/// Aggregated stock demand for one ingredient, across the base recipe and
/// all add-on recipes of a single checkout line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientDemand {
    /// Inventory item name.
    pub ingredient: String,
    /// Total units to deduct. Always positive.
    pub units: i64,
}

// =============================================================================
// Removal Validation
// =============================================================================

/// Validates customer removals against the base item's recipe.
///
/// Each removal must name an ingredient the recipe contains, request a
/// positive quantity, and stay within the per-unit recipe amount.
pub fn validate_removals(item: &MenuItem, removals: &[RemovedIngredient]) -> CoreResult<()> {
    for removal in removals {
        let line = item
            .recipe_line(&removal.inventory_item)
            .ok_or_else(|| CoreError::RemovalNotInRecipe(removal.inventory_item.clone()))?;

        if removal.quantity <= 0 {
            return Err(crate::error::ValidationError::MustBePositive {
                field: format!("removedIngredients[{}].quantity", removal.inventory_item),
            }
            .into());
        }

        if removal.quantity > line.quantity {
            return Err(CoreError::RemovalExceedsRecipe {
                ingredient: removal.inventory_item.clone(),
                in_recipe: line.quantity,
                requested: removal.quantity,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Demand Resolution
// =============================================================================

/// Resolves the full ingredient demand for one checkout line.
///
/// `add_ons` pairs each add-on menu item with its own quantity. Every add-on
/// must belong to the reserved add-on category; anything else is rejected so
/// a regular item can never ride along as a "free" supplement.
///
/// The result is sorted by ingredient name, which gives the downstream
/// deduction loop a deterministic order.
pub fn resolve_demand(
    item: &MenuItem,
    quantity: i64,
    removals: &[RemovedIngredient],
    add_ons: &[(MenuItem, i64)],
) -> CoreResult<Vec<IngredientDemand>> {
    validate_removals(item, removals)?;

    let mut demand: BTreeMap<String, i64> = BTreeMap::new();

    // Base recipe, net of removals, scaled by line quantity.
    for line in &item.ingredients {
        let removed = removals
            .iter()
            .find(|r| r.inventory_item == line.inventory_item)
            .map(|r| r.quantity)
            .unwrap_or(0);
        let net_per_unit = (line.quantity - removed).max(0);
        if net_per_unit > 0 {
            *demand.entry(line.inventory_item.clone()).or_insert(0) += net_per_unit * quantity;
        }
    }

    // Add-on recipes, scaled by the add-on's own quantity. Removals never
    // reach these lines.
    for (add_on, add_on_qty) in add_ons {
        if !add_on.is_add_on() {
            return Err(CoreError::NotAnAddOn(add_on.name.clone()));
        }
        for line in &add_on.ingredients {
            let units = line.quantity * add_on_qty;
            if units > 0 {
                *demand.entry(line.inventory_item.clone()).or_insert(0) += units;
            }
        }
    }

    Ok(demand
        .into_iter()
        .filter(|(_, units)| *units > 0)
        .map(|(ingredient, units)| IngredientDemand { ingredient, units })
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeIngredient;
    use chrono::Utc;

    fn menu_item(name: &str, category: &str, recipe: &[(&str, i64)]) -> MenuItem {
        MenuItem {
            id: format!("id-{name}"),
            name: name.to_string(),
            price_cents: 25000,
            category: category.to_string(),
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

    fn tonkotsu() -> MenuItem {
        menu_item("Tonkotsu Ramen", "ramen", &[("Noodles", 2), ("Broth", 1)])
    }

    fn removal(ingredient: &str, quantity: i64) -> RemovedIngredient {
        RemovedIngredient {
            inventory_item: ingredient.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_base_recipe_scales_by_quantity() {
        let demand = resolve_demand(&tonkotsu(), 2, &[], &[]).unwrap();
        assert_eq!(
            demand,
            vec![
                IngredientDemand {
                    ingredient: "Broth".to_string(),
                    units: 2
                },
                IngredientDemand {
                    ingredient: "Noodles".to_string(),
                    units: 4
                },
            ]
        );
    }

    #[test]
    fn test_removal_at_recipe_bound_skips_ingredient() {
        // Removing all Broth per unit: Broth drops out entirely, Noodles
        // deduct normally.
        let demand = resolve_demand(&tonkotsu(), 2, &[removal("Broth", 1)], &[]).unwrap();
        assert_eq!(
            demand,
            vec![IngredientDemand {
                ingredient: "Noodles".to_string(),
                units: 4
            }]
        );
    }

    #[test]
    fn test_removal_not_in_recipe_rejected() {
        let err = resolve_demand(&tonkotsu(), 1, &[removal("Chashu", 1)], &[]).unwrap_err();
        assert!(matches!(err, CoreError::RemovalNotInRecipe(name) if name == "Chashu"));
    }

    #[test]
    fn test_removal_exceeding_recipe_rejected() {
        let err = resolve_demand(&tonkotsu(), 1, &[removal("Broth", 2)], &[]).unwrap_err();
        assert!(matches!(err, CoreError::RemovalExceedsRecipe { .. }));
        assert_eq!(
            err.to_string(),
            "Cannot remove more Broth than what's in the menu item"
        );
    }

    #[test]
    fn test_non_positive_removal_rejected() {
        let err = resolve_demand(&tonkotsu(), 1, &[removal("Broth", 0)], &[]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_add_on_resolves_its_own_recipe() {
        let chashu = menu_item("Extra Chashu", "add-ons", &[("Chashu", 1)]);
        let demand = resolve_demand(&tonkotsu(), 1, &[], &[(chashu, 2)]).unwrap();
        assert_eq!(
            demand,
            vec![
                IngredientDemand {
                    ingredient: "Broth".to_string(),
                    units: 1
                },
                IngredientDemand {
                    ingredient: "Chashu".to_string(),
                    units: 2
                },
                IngredientDemand {
                    ingredient: "Noodles".to_string(),
                    units: 2
                },
            ]
        );
    }

    #[test]
    fn test_shared_ingredient_aggregates_across_recipes() {
        let extra_noodles = menu_item("Extra Noodles", "add-ons", &[("Noodles", 1)]);
        let demand = resolve_demand(&tonkotsu(), 2, &[], &[(extra_noodles, 1)]).unwrap();
        let noodles = demand
            .iter()
            .find(|d| d.ingredient == "Noodles")
            .unwrap();
        // 2 per unit * 2 units from the base, plus 1 from the add-on.
        assert_eq!(noodles.units, 5);
    }

    #[test]
    fn test_removals_do_not_touch_add_on_recipes() {
        // The base recipe's Broth is removed; the add-on also uses Broth and
        // must still deduct its full amount.
        let rich = menu_item("Rich Broth Boost", "add-ons", &[("Broth", 1)]);
        let demand = resolve_demand(&tonkotsu(), 1, &[removal("Broth", 1)], &[(rich, 1)]).unwrap();
        let broth = demand.iter().find(|d| d.ingredient == "Broth").unwrap();
        assert_eq!(broth.units, 1);
    }

    #[test]
    fn test_regular_item_as_add_on_rejected() {
        let gyoza = menu_item("Gyoza", "sides", &[("Gyoza Wrapper", 6)]);
        let err = resolve_demand(&tonkotsu(), 1, &[], &[(gyoza, 1)]).unwrap_err();
        assert!(matches!(err, CoreError::NotAnAddOn(name) if name == "Gyoza"));
    }
}
