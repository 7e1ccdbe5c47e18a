//! # Checkout Engine
//!
//! Turns a validated cart line into a persisted sale and the matching stock
//! deductions, atomically.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Flow                                      │
//! │                                                                         │
//! │  Validate fields (quantity, IDs, payment, service)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Load menu item + add-on items (reject non-add-ons)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve ingredient demand  (ramen-core::recipe)                       │
//! │  net = max(0, recipe - removed) * qty, plus add-on recipes             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                     │
//! │  │  next order code:                                                   │
//! │  │    UPDATE counters SET value = value + 1                            │
//! │  │    WHERE name = 'order_code' RETURNING value                        │
//! │  │                                                                     │
//! │  │  for each (ingredient, units) in demand:                            │
//! │  │    UPDATE inventory_items SET stock = stock - units                 │
//! │  │    WHERE name = ? AND stock >= units        ← the guard             │
//! │  │         │                                                           │
//! │  │         ├── 0 rows → InsufficientStock / IngredientNotFound         │
//! │  │         │            → ROLLBACK (nothing was deducted)              │
//! │  │         ▼                                                           │
//! │  │  INSERT INTO sales (... status 'pending' ...)                       │
//! │  COMMIT                                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional UPDATE is the whole concurrency story: two checkouts
//! racing for the last unit serialize on the row, and the loser's guard
//! fails, rolling its entire sale back. Stock can never go negative.
//!
//! Order codes come from a monotonic counter inside the same transaction, so
//! a failed checkout burns no code and concurrent checkouts can't collide.

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CheckoutError, CheckoutResult, DbError};
use ramen_core::{
    format_order_code, resolve_demand, validation, CoreError, MenuItem, Money, OrderStatus,
    PaymentMethod, RemovedIngredient, Sale, SaleAddOn, ServiceType,
};

// =============================================================================
// Request Types
// =============================================================================

/// An add-on selection on a checkout request.
#[derive(Debug, Clone)]
pub struct CheckoutAddOn {
    pub menu_item_id: String,
    pub quantity: i64,
}

/// A single-line checkout request from the cashier screen.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub menu_item_id: String,
    pub quantity: i64,
    pub add_ons: Vec<CheckoutAddOn>,
    pub removed_ingredients: Vec<RemovedIngredient>,
    pub payment_method: PaymentMethod,
    pub service_type: ServiceType,
}

// =============================================================================
// Checkout Engine
// =============================================================================

/// Executes checkout transactions.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    /// Creates a new CheckoutEngine.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Runs a full checkout and returns the persisted sale.
    ///
    /// All-or-nothing: any failure (validation, stock, storage) leaves the
    /// inventory and the sales table exactly as they were.
    pub async fn checkout(&self, request: CheckoutRequest) -> CheckoutResult<Sale> {
        // Field validation, before anything touches the database.
        validation::validate_uuid("menuItemId", &request.menu_item_id)
            .map_err(CoreError::from)?;
        validation::validate_quantity("quantity", request.quantity).map_err(CoreError::from)?;
        for (idx, add_on) in request.add_ons.iter().enumerate() {
            validation::validate_uuid(&format!("addOns[{idx}].menuItemId"), &add_on.menu_item_id)
                .map_err(CoreError::from)?;
            validation::validate_quantity(&format!("addOns[{idx}].quantity"), add_on.quantity)
                .map_err(CoreError::from)?;
        }

        // Resolve the items. Name and price are read here and frozen into
        // the sale; a menu edit mid-checkout affects only future sales.
        let menu = crate::repository::menu::MenuRepository::new(self.pool.clone());
        let item = menu
            .get_by_id(&request.menu_item_id)
            .await
            .map_err(CheckoutError::Db)?
            .ok_or_else(|| CoreError::MenuItemNotFound(request.menu_item_id.clone()))?;

        let mut add_on_items: Vec<(MenuItem, i64)> = Vec::with_capacity(request.add_ons.len());
        for add_on in &request.add_ons {
            let add_on_item = menu
                .get_by_id(&add_on.menu_item_id)
                .await
                .map_err(CheckoutError::Db)?
                .ok_or_else(|| CoreError::MenuItemNotFound(add_on.menu_item_id.clone()))?;
            add_on_items.push((add_on_item, add_on.quantity));
        }

        // Business rules: removals bounded by recipe, add-ons must be
        // add-ons, demand aggregated per ingredient.
        let demand = resolve_demand(
            &item,
            request.quantity,
            &request.removed_ingredients,
            &add_on_items,
        )?;

        let add_ons: Vec<SaleAddOn> = add_on_items
            .iter()
            .map(|(add_on_item, qty)| SaleAddOn {
                menu_item_id: add_on_item.id.clone(),
                name_snapshot: add_on_item.name.clone(),
                quantity: *qty,
                price_cents: add_on_item.price_cents,
            })
            .collect();

        let total = item.price() * request.quantity
            + add_ons
                .iter()
                .map(|a| a.price() * a.quantity)
                .sum::<Money>();

        debug!(
            menu_item = %item.name,
            quantity = request.quantity,
            ingredients = demand.len(),
            total = %total,
            "Starting checkout transaction"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Order code: bump the counter inside the transaction. A rollback
        // returns the value, so failed checkouts burn no codes.
        let seq: i64 = sqlx::query_scalar(
            "UPDATE counters SET value = value + 1 WHERE name = 'order_code' RETURNING value",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(DbError::from)?;
        let order_code = format_order_code(seq);

        // Conditional deductions, in deterministic (sorted) ingredient order.
        // A failed guard propagates out and the dropped transaction undoes
        // every earlier deduction.
        for entry in &demand {
            crate::repository::inventory::deduct_guarded(&mut tx, &entry.ingredient, entry.units)
                .await?;
        }

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            order_code,
            menu_item_id: item.id.clone(),
            name_snapshot: item.name.clone(),
            quantity: request.quantity,
            unit_price_cents: item.price_cents,
            add_ons,
            removed_ingredients: request.removed_ingredients,
            payment_method: request.payment_method,
            service_type: request.service_type,
            total_cents: total.cents(),
            status: OrderStatus::Pending,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let add_ons_json = serde_json::to_string(&sale.add_ons)
            .map_err(|e| DbError::corrupt_json("sales", "add_ons", e))?;
        let removed_json = serde_json::to_string(&sale.removed_ingredients)
            .map_err(|e| DbError::corrupt_json("sales", "removed_ingredients", e))?;

        sqlx::query(
            "INSERT INTO sales \
                 (id, order_code, menu_item_id, name_snapshot, quantity, unit_price_cents, \
                  add_ons, removed_ingredients, payment_method, service_type, total_cents, \
                  status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&sale.id)
        .bind(&sale.order_code)
        .bind(&sale.menu_item_id)
        .bind(&sale.name_snapshot)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(&add_ons_json)
        .bind(&removed_json)
        .bind(sale.payment_method)
        .bind(sale.service_type)
        .bind(sale.total_cents)
        .bind(sale.status)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_code = %sale.order_code,
            total = %sale.total(),
            "Checkout complete"
        );

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::menu::NewMenuItem;
    use ramen_core::RecipeIngredient;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_inventory(db: &Database, items: &[(&str, i64)]) {
        for (name, stock) in items {
            db.inventory().insert(name, *stock).await.unwrap();
        }
    }

    async fn seed_menu_item(
        db: &Database,
        name: &str,
        price_cents: i64,
        category: &str,
        recipe: &[(&str, i64)],
    ) -> MenuItem {
        db.menu()
            .insert(NewMenuItem {
                name: name.to_string(),
                price_cents,
                category: category.to_string(),
                image: None,
                ingredients: recipe
                    .iter()
                    .map(|(ing, qty)| RecipeIngredient {
                        inventory_item: ing.to_string(),
                        quantity: *qty,
                    })
                    .collect(),
            })
            .await
            .unwrap()
    }

    fn request(menu_item_id: &str, quantity: i64) -> CheckoutRequest {
        CheckoutRequest {
            menu_item_id: menu_item_id.to_string(),
            quantity,
            add_ons: vec![],
            removed_ingredients: vec![],
            payment_method: PaymentMethod::Cash,
            service_type: ServiceType::DineIn,
        }
    }

    async fn stock_of(db: &Database, name: &str) -> i64 {
        db.inventory()
            .get_by_name(name)
            .await
            .unwrap()
            .unwrap()
            .stock
    }

    #[tokio::test]
    async fn test_checkout_deducts_stock_and_persists_sale() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10), ("Broth", 5)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;

        let sale = db.checkout().checkout(request(&ramen.id, 2)).await.unwrap();

        assert_eq!(sale.order_code, "0001");
        assert_eq!(sale.status, OrderStatus::Pending);
        assert_eq!(sale.total_cents, 50000);
        assert_eq!(sale.name_snapshot, "Tonkotsu Ramen");

        assert_eq!(stock_of(&db, "Noodles").await, 6);
        assert_eq!(stock_of(&db, "Broth").await, 3);

        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.order_code, "0001");
        assert_eq!(stored.total_cents, 50000);
    }

    #[tokio::test]
    async fn test_large_quantity_succeeds_when_stock_covers_it() {
        // Bulk orders have no artificial quantity ceiling. Stock is the
        // only limit.
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 5000), ("Broth", 5000)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;

        let sale = db
            .checkout()
            .checkout(request(&ramen.id, 1000))
            .await
            .unwrap();

        assert_eq!(sale.quantity, 1000);
        assert_eq!(sale.total_cents, 25_000_000);
        assert_eq!(stock_of(&db, "Noodles").await, 3000);
        assert_eq!(stock_of(&db, "Broth").await, 4000);
    }

    #[tokio::test]
    async fn test_removal_skips_ingredient_without_touching_price() {
        // Quantity 2, Broth removal at the recipe bound: Broth untouched,
        // Noodles deduct in full, total unchanged.
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10), ("Broth", 5)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;

        let mut req = request(&ramen.id, 2);
        req.removed_ingredients = vec![RemovedIngredient {
            inventory_item: "Broth".to_string(),
            quantity: 1,
        }];
        let sale = db.checkout().checkout(req).await.unwrap();

        assert_eq!(sale.total_cents, 50000);
        assert_eq!(stock_of(&db, "Noodles").await, 6);
        assert_eq!(stock_of(&db, "Broth").await, 5);
    }

    #[tokio::test]
    async fn test_insufficient_add_on_stock_rolls_back_everything() {
        // The base item's ingredients are plentiful; the add-on's sole
        // ingredient is at zero. Nothing may be deducted and no sale stored.
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10), ("Broth", 5), ("Chashu", 0)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;
        let chashu = seed_menu_item(&db, "Extra Chashu", 8000, "add-ons", &[("Chashu", 1)]).await;

        let mut req = request(&ramen.id, 1);
        req.add_ons = vec![CheckoutAddOn {
            menu_item_id: chashu.id.clone(),
            quantity: 1,
        }];
        let err = db.checkout().checkout(req).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Insufficient stock for Chashu. Available: 0, Required: 1"
        );
        assert_eq!(stock_of(&db, "Noodles").await, 10);
        assert_eq!(stock_of(&db, "Broth").await, 5);
        assert_eq!(stock_of(&db, "Chashu").await, 0);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_on_price_included_in_total() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10), ("Broth", 5), ("Chashu", 4)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;
        let chashu = seed_menu_item(&db, "Extra Chashu", 8000, "add-ons", &[("Chashu", 1)]).await;

        let mut req = request(&ramen.id, 2);
        req.add_ons = vec![CheckoutAddOn {
            menu_item_id: chashu.id.clone(),
            quantity: 2,
        }];
        let sale = db.checkout().checkout(req).await.unwrap();

        // 250.00 * 2 + 80.00 * 2
        assert_eq!(sale.total_cents, 66000);
        assert_eq!(stock_of(&db, "Chashu").await, 2);
        assert_eq!(sale.add_ons.len(), 1);
        assert_eq!(sale.add_ons[0].name_snapshot, "Extra Chashu");
    }

    #[tokio::test]
    async fn test_regular_item_rejected_as_add_on() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10), ("Broth", 5), ("Gyoza Wrapper", 30)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;
        let gyoza = seed_menu_item(&db, "Gyoza", 12000, "sides", &[("Gyoza Wrapper", 6)]).await;

        let mut req = request(&ramen.id, 1);
        req.add_ons = vec![CheckoutAddOn {
            menu_item_id: gyoza.id.clone(),
            quantity: 1,
        }];
        let err = db.checkout().checkout(req).await.unwrap_err();

        assert_eq!(err.to_string(), "Menu item Gyoza is not an add-on");
        assert_eq!(stock_of(&db, "Noodles").await, 10);
    }

    #[tokio::test]
    async fn test_order_codes_are_sequential_and_zero_padded() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 100), ("Broth", 100)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;

        let first = db.checkout().checkout(request(&ramen.id, 1)).await.unwrap();
        let second = db.checkout().checkout(request(&ramen.id, 1)).await.unwrap();
        assert_eq!(first.order_code, "0001");
        assert_eq!(second.order_code, "0002");

        // Deleting a sale must not free its code.
        db.sales().delete(&second.id).await.unwrap();
        let third = db.checkout().checkout(request(&ramen.id, 1)).await.unwrap();
        assert_eq!(third.order_code, "0003");
    }

    #[tokio::test]
    async fn test_failed_checkout_burns_no_order_code() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 1)]).await;
        let ramen = seed_menu_item(&db, "Plain Noodles", 15000, "ramen", &[("Noodles", 2)]).await;

        assert!(db.checkout().checkout(request(&ramen.id, 1)).await.is_err());

        seed_inventory(&db, &[("Broth", 10)]).await;
        let shoyu = seed_menu_item(&db, "Shoyu Ramen", 22000, "ramen", &[("Broth", 1)]).await;
        let sale = db.checkout().checkout(request(&shoyu.id, 1)).await.unwrap();
        assert_eq!(sale.order_code, "0001");
    }

    #[tokio::test]
    async fn test_deleted_ingredient_reported_not_found() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;

        let err = db.checkout().checkout(request(&ramen.id, 1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Ingredient not found in inventory: Broth");
        assert_eq!(stock_of(&db, "Noodles").await, 10);
    }

    #[tokio::test]
    async fn test_sale_round_trips_through_order_code() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10), ("Broth", 5), ("Chashu", 4)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;
        let chashu = seed_menu_item(&db, "Extra Chashu", 8000, "add-ons", &[("Chashu", 1)]).await;

        let mut req = request(&ramen.id, 2);
        req.add_ons = vec![CheckoutAddOn {
            menu_item_id: chashu.id.clone(),
            quantity: 1,
        }];
        req.removed_ingredients = vec![RemovedIngredient {
            inventory_item: "Broth".to_string(),
            quantity: 1,
        }];
        let sale = db.checkout().checkout(req).await.unwrap();

        let fetched = db
            .sales()
            .get_by_order_code(&sale.order_code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, sale.id);
        assert_eq!(fetched.quantity, 2);
        assert_eq!(fetched.add_ons, sale.add_ons);
        assert_eq!(fetched.removed_ingredients, sale.removed_ingredients);
        assert_eq!(fetched.payment_method, PaymentMethod::Cash);
        assert_eq!(fetched.service_type, ServiceType::DineIn);
    }

    #[tokio::test]
    async fn test_base_recipe_shortage_deducts_nothing() {
        // Noodles are ample, Broth is short: the whole order fails and
        // neither ingredient moves.
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 100), ("Broth", 1)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;

        let err = db.checkout().checkout(request(&ramen.id, 2)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Broth. Available: 1, Required: 2"
        );
        assert_eq!(stock_of(&db, "Noodles").await, 100);
        assert_eq!(stock_of(&db, "Broth").await, 1);
        assert!(db.sales().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_removal_exceeding_recipe_leaves_inventory_unchanged() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10), ("Broth", 5)]).await;
        let ramen = seed_menu_item(
            &db,
            "Tonkotsu Ramen",
            25000,
            "ramen",
            &[("Noodles", 2), ("Broth", 1)],
        )
        .await;

        let mut req = request(&ramen.id, 1);
        req.removed_ingredients = vec![RemovedIngredient {
            inventory_item: "Broth".to_string(),
            quantity: 2,
        }];
        let err = db.checkout().checkout(req).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cannot remove more Broth than what's in the menu item"
        );
        assert_eq!(stock_of(&db, "Noodles").await, 10);
        assert_eq!(stock_of(&db, "Broth").await, 5);
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected_before_any_work() {
        let db = test_db().await;
        seed_inventory(&db, &[("Noodles", 10)]).await;
        let ramen = seed_menu_item(&db, "Plain Noodles", 15000, "ramen", &[("Noodles", 2)]).await;

        assert!(db.checkout().checkout(request(&ramen.id, 0)).await.is_err());
        assert!(db.checkout().checkout(request(&ramen.id, -3)).await.is_err());
        assert_eq!(stock_of(&db, "Noodles").await, 10);
    }
}
