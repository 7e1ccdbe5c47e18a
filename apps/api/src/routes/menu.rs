//! Menu endpoints: CRUD, category views, and stock-annotated listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use crate::extract::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use ramen_core::stock::{self, IngredientStock};
use ramen_core::validation::{validate_category, validate_name, validate_price_cents};
use ramen_core::{CoreError, MenuItem, RecipeIngredient, ADD_ON_CATEGORY};
use ramen_db::NewMenuItem;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / Response Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemBody {
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

/// A menu item with its recipe replaced by per-ingredient availability.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemWithStock {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientStock>,
    pub can_be_ordered: bool,
    pub has_out_of_stock: bool,
    pub has_low_stock: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /menu`
pub async fn list_menu(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(state.db.menu().list().await?))
}

/// `GET /menu/add-ons`
pub async fn list_add_ons(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(state.db.menu().list_by_category(ADD_ON_CATEGORY).await?))
}

/// `GET /menu/category/{category}`
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(state.db.menu().list_by_category(&category).await?))
}

/// `GET /menu/with-stock` — every menu item annotated with what the current
/// inventory can support. One stock-level snapshot serves the whole listing.
pub async fn list_menu_with_stock(
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuItemWithStock>>, ApiError> {
    let items = state.db.menu().list().await?;
    let levels = state.db.inventory().stock_levels().await?;
    let threshold = state.config.low_stock_threshold;

    let annotated = items
        .into_iter()
        .map(|item| {
            let report = stock::annotate(&item, &levels, threshold);
            MenuItemWithStock {
                id: item.id,
                name: item.name,
                price_cents: item.price_cents,
                category: item.category,
                image: item.image,
                ingredients: report.ingredients,
                can_be_ordered: report.can_be_ordered,
                has_out_of_stock: report.has_out_of_stock,
                has_low_stock: report.has_low_stock,
            }
        })
        .collect();

    Ok(Json(annotated))
}

/// `GET /menu/{id}`
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuItem>, ApiError> {
    let item = state
        .db
        .menu()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu item", &id))?;
    Ok(Json(item))
}

/// `POST /menu`
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(body): Json<MenuItemBody>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    validate_body(&state, &body).await?;

    let item = state
        .db
        .menu()
        .insert(NewMenuItem {
            name: body.name,
            price_cents: body.price_cents,
            category: body.category,
            image: body.image,
            ingredients: body.ingredients,
        })
        .await?;

    info!(id = %item.id, name = %item.name, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /menu/{id}` — full replacement of the mutable fields.
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MenuItemBody>,
) -> Result<Json<MenuItem>, ApiError> {
    validate_body(&state, &body).await?;

    let item = state
        .db
        .menu()
        .update(
            &id,
            NewMenuItem {
                name: body.name,
                price_cents: body.price_cents,
                category: body.category,
                image: body.image,
                ingredients: body.ingredients,
            },
        )
        .await?;

    Ok(Json(item))
}

/// `DELETE /menu/{id}` — existing sales keep their snapshots.
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.menu().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Validation
// =============================================================================

/// Field validation plus the recipe integrity check: every ingredient must
/// name an existing inventory item with a positive per-unit quantity.
async fn validate_body(state: &AppState, body: &MenuItemBody) -> Result<(), ApiError> {
    validate_name("name", &body.name).map_err(CoreError::from)?;
    validate_price_cents(body.price_cents).map_err(CoreError::from)?;
    validate_category(&body.category).map_err(CoreError::from)?;

    if body.ingredients.is_empty() {
        return Ok(());
    }

    let levels = state.db.inventory().stock_levels().await?;
    for line in &body.ingredients {
        if line.quantity <= 0 {
            return Err(ApiError::validation(format!(
                "Ingredient quantity must be positive: {}",
                line.inventory_item
            )));
        }
        if !levels.contains_key(&line.inventory_item) {
            return Err(ApiError::validation(format!(
                "Ingredient not found in inventory: {}",
                line.inventory_item
            )));
        }
    }

    Ok(())
}
