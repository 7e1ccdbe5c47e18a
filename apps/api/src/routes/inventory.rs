//! Inventory endpoints: listing, creation, absolute stock writes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use crate::extract::Json;
use serde::Deserialize;
use tracing::info;

use ramen_core::validation::{validate_name, validate_stock};
use ramen_core::{CoreError, InventoryItem};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateInventoryBody {
    pub name: String,
    pub stock: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetStockBody {
    pub stock: i64,
}

/// `GET /inventory`
pub async fn list_inventory(
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    Ok(Json(state.db.inventory().list().await?))
}

/// `POST /inventory`
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(body): Json<CreateInventoryBody>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    validate_name("name", &body.name).map_err(CoreError::from)?;
    validate_stock(body.stock).map_err(CoreError::from)?;

    let item = state.db.inventory().insert(&body.name, body.stock).await?;
    info!(name = %item.name, stock = item.stock, "Inventory item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /inventory/{id}` — absolute stock write, not a delta. Restocks and
/// corrections both go through here.
pub async fn set_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetStockBody>,
) -> Result<Json<InventoryItem>, ApiError> {
    validate_stock(body.stock).map_err(CoreError::from)?;

    let item = state.db.inventory().set_stock(&id, body.stock).await?;
    info!(name = %item.name, stock = item.stock, "Stock level set");
    Ok(Json(item))
}

/// `DELETE /inventory/{id}`
///
/// Recipes referencing the deleted ingredient will fail checkout until they
/// are edited; menu rows join by name and are never cascaded.
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.inventory().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
