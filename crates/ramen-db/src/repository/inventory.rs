//! # Inventory Repository
//!
//! Reads and writes for the stock ledger.
//!
//! The guarded deduction lives here as [`deduct_guarded`], taking any
//! connection: the checkout engine in [`crate::checkout`] runs it inside its
//! transaction, and [`InventoryRepository::deduct`] exposes it standalone for
//! single-ingredient adjustments (spillage, waste logging).

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CheckoutResult, DbError, DbResult};
use ramen_core::{CoreError, InventoryItem};

#[derive(Debug, sqlx::FromRow)]
struct InventoryItemRow {
    id: String,
    name: String,
    stock: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InventoryItemRow> for InventoryItem {
    fn from(row: InventoryItemRow) -> Self {
        InventoryItem {
            id: row.id,
            name: row.name,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Lists all inventory items, alphabetically.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let rows: Vec<InventoryItemRow> = sqlx::query_as(
            "SELECT id, name, stock, created_at, updated_at \
             FROM inventory_items ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    /// Gets an inventory item by its unique name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<InventoryItem>> {
        let row: Option<InventoryItemRow> = sqlx::query_as(
            "SELECT id, name, stock, created_at, updated_at \
             FROM inventory_items WHERE name = ?1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(InventoryItem::from))
    }

    /// Gets an inventory item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let row: Option<InventoryItemRow> = sqlx::query_as(
            "SELECT id, name, stock, created_at, updated_at \
             FROM inventory_items WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(InventoryItem::from))
    }

    /// Returns all stock levels as a name → stock map.
    ///
    /// Feeds `ramen_core::stock::annotate` for the menu-with-stock view.
    pub async fn stock_levels(&self) -> DbResult<HashMap<String, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT name, stock FROM inventory_items")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Creates a new inventory item.
    ///
    /// Fails with [`DbError::UniqueViolation`] when the name already exists.
    pub async fn insert(&self, name: &str, stock: i64) -> DbResult<InventoryItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %name, stock, "Inserting inventory item");

        sqlx::query(
            "INSERT INTO inventory_items (id, name, stock, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&id)
        .bind(name)
        .bind(stock)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(InventoryItem {
            id,
            name: name.to_string(),
            stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Deducts `units` from an item's stock, guarded against going negative.
    ///
    /// Single-ingredient adjustments (spillage, waste logging) go through
    /// the same [`deduct_guarded`] the checkout engine runs per ingredient.
    /// Deducting down to exactly zero succeeds.
    pub async fn deduct(&self, name: &str, units: i64) -> CheckoutResult<InventoryItem> {
        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        deduct_guarded(&mut conn, name, units).await?;
        drop(conn);

        debug!(name, units, "Deducted stock");
        self.get_by_name(name)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", name).into())
    }

    /// Sets an item's stock to an absolute value (stocktake correction).
    pub async fn set_stock(&self, id: &str, stock: i64) -> DbResult<InventoryItem> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE inventory_items SET stock = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id))
    }

    /// Deletes an inventory item.
    ///
    /// Recipes referencing the name keep it; the menu-with-stock view then
    /// reports the ingredient as "not found" and the item stops being
    /// orderable.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        debug!(id = %id, "Deleted inventory item");
        Ok(())
    }
}

/// Conditionally deducts `units` from an ingredient on any connection.
///
/// The `stock >= units` guard makes the update a no-op instead of driving
/// stock negative. Zero rows affected means either the row is missing
/// ([`CoreError::IngredientNotFound`]) or stock is too low
/// ([`CoreError::InsufficientStock`]); a follow-up read tells the two apart.
///
/// The checkout engine calls this per ingredient inside its transaction;
/// [`InventoryRepository::deduct`] calls it on a plain pool connection.
pub(crate) async fn deduct_guarded(
    conn: &mut SqliteConnection,
    name: &str,
    units: i64,
) -> CheckoutResult<()> {
    let result = sqlx::query(
        "UPDATE inventory_items \
         SET stock = stock - ?2, updated_at = ?3 \
         WHERE name = ?1 AND stock >= ?2",
    )
    .bind(name)
    .bind(units)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(DbError::from)?;

    if result.rows_affected() == 0 {
        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM inventory_items WHERE name = ?1")
                .bind(name)
                .fetch_optional(&mut *conn)
                .await
                .map_err(DbError::from)?;

        return Err(match available {
            Some(available) => CoreError::InsufficientStock {
                ingredient: name.to_string(),
                available,
                required: units,
            },
            None => CoreError::IngredientNotFound(name.to_string()),
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckoutError;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_duplicate_name_is_rejected() {
        let db = test_db().await;
        db.inventory().insert("Noodles", 10).await.unwrap();

        let err = db.inventory().insert("Noodles", 5).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_deduct_down_to_zero_succeeds() {
        let db = test_db().await;
        db.inventory().insert("Chashu", 3).await.unwrap();

        let item = db.inventory().deduct("Chashu", 3).await.unwrap();
        assert_eq!(item.stock, 0);
    }

    #[tokio::test]
    async fn test_deduct_below_zero_reports_available() {
        let db = test_db().await;
        db.inventory().insert("Chashu", 2).await.unwrap();

        let err = db.inventory().deduct("Chashu", 3).await.unwrap_err();
        match err {
            CheckoutError::Core(CoreError::InsufficientStock {
                available, required, ..
            }) => {
                assert_eq!(available, 2);
                assert_eq!(required, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Nothing was deducted.
        let item = db.inventory().get_by_name("Chashu").await.unwrap().unwrap();
        assert_eq!(item.stock, 2);
    }

    #[tokio::test]
    async fn test_deduct_missing_ingredient() {
        let db = test_db().await;
        let err = db.inventory().deduct("Truffle", 1).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Core(CoreError::IngredientNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_set_stock_is_absolute() {
        let db = test_db().await;
        let item = db.inventory().insert("Rice", 10).await.unwrap();

        let updated = db.inventory().set_stock(&item.id, 70).await.unwrap();
        assert_eq!(updated.stock, 70);
    }
}
