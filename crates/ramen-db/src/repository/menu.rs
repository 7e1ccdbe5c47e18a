//! # Menu Repository
//!
//! Database operations for menu items.
//!
//! ## JSON Column Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu_items.ingredients is a JSON TEXT column:                          │
//! │                                                                         │
//! │  '[{"inventoryItem":"Noodles","quantity":2},                            │
//! │    {"inventoryItem":"Broth","quantity":1}]'                             │
//! │                                                                         │
//! │  Row fetch ──► MenuItemRow (raw TEXT)                                   │
//! │                     │                                                   │
//! │                     ▼ serde_json                                        │
//! │               MenuItem { ingredients: Vec<RecipeIngredient> }           │
//! │                                                                         │
//! │  Decoding happens once at the row boundary; the rest of the code        │
//! │  never sees raw JSON.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ramen_core::{MenuItem, RecipeIngredient};

/// Raw row shape; `ingredients` still serialized.
#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    price_cents: i64,
    category: String,
    image: Option<String>,
    ingredients: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MenuItemRow {
    fn into_domain(self) -> DbResult<MenuItem> {
        let ingredients: Vec<RecipeIngredient> = serde_json::from_str(&self.ingredients)
            .map_err(|e| DbError::corrupt_json("menu_items", "ingredients", e))?;
        Ok(MenuItem {
            id: self.id,
            name: self.name,
            price_cents: self.price_cents,
            category: self.category,
            image: self.image,
            ingredients,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, name, price_cents, category, image, ingredients, \
     created_at, updated_at";

/// New-item input; id and timestamps are generated on insert.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    pub image: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Repository for menu item database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// Lists all menu items, newest first.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM menu_items ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MenuItemRow::into_domain).collect()
    }

    /// Lists menu items in one category (exact match).
    pub async fn list_by_category(&self, category: &str) -> DbResult<Vec<MenuItem>> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM menu_items WHERE category = ?1 \
             ORDER BY created_at DESC"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MenuItemRow::into_domain).collect()
    }

    /// Gets a menu item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let row: Option<MenuItemRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM menu_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MenuItemRow::into_domain).transpose()
    }

    /// Gets a menu item by ID, failing when absent.
    pub async fn require_by_id(&self, id: &str) -> DbResult<MenuItem> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Menu item", id))
    }

    /// Inserts a new menu item and returns it.
    pub async fn insert(&self, input: NewMenuItem) -> DbResult<MenuItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let ingredients_json = serde_json::to_string(&input.ingredients)
            .map_err(|e| DbError::corrupt_json("menu_items", "ingredients", e))?;

        debug!(id = %id, name = %input.name, "Inserting menu item");

        sqlx::query(
            "INSERT INTO menu_items \
                 (id, name, price_cents, category, image, ingredients, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&id)
        .bind(&input.name)
        .bind(input.price_cents)
        .bind(&input.category)
        .bind(&input.image)
        .bind(&ingredients_json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(MenuItem {
            id,
            name: input.name,
            price_cents: input.price_cents,
            category: input.category,
            image: input.image,
            ingredients: input.ingredients,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces a menu item's editable fields.
    ///
    /// Past sales are unaffected: they carry name/price snapshots.
    pub async fn update(&self, id: &str, input: NewMenuItem) -> DbResult<MenuItem> {
        let now = Utc::now();
        let ingredients_json = serde_json::to_string(&input.ingredients)
            .map_err(|e| DbError::corrupt_json("menu_items", "ingredients", e))?;

        let result = sqlx::query(
            "UPDATE menu_items SET \
                 name = ?2, price_cents = ?3, category = ?4, image = ?5, \
                 ingredients = ?6, updated_at = ?7 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price_cents)
        .bind(&input.category)
        .bind(&input.image)
        .bind(&ingredients_json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        self.require_by_id(id).await
    }

    /// Deletes a menu item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Menu item", id));
        }

        debug!(id = %id, "Deleted menu item");
        Ok(())
    }
}
