//! Sales endpoints: checkout plus standard CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use crate::extract::Json;
use serde::Deserialize;
use tracing::info;

use ramen_core::{OrderStatus, PaymentMethod, RemovedIngredient, Sale, ServiceType};
use ramen_db::{CheckoutAddOn, CheckoutRequest};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request Shapes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnBody {
    pub menu_item_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleBody {
    pub menu_item_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub add_ons: Vec<AddOnBody>,
    #[serde(default)]
    pub removed_ingredients: Vec<RemovedIngredient>,
    pub payment_method: PaymentMethod,
    pub service_type: ServiceType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleBody {
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub service_type: Option<ServiceType>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /sales` — full checkout: validate, deduct stock, persist.
pub async fn create_sale(
    State(state): State<AppState>,
    Json(body): Json<CreateSaleBody>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let request = CheckoutRequest {
        menu_item_id: body.menu_item_id,
        quantity: body.quantity,
        add_ons: body
            .add_ons
            .into_iter()
            .map(|a| CheckoutAddOn {
                menu_item_id: a.menu_item_id,
                quantity: a.quantity,
            })
            .collect(),
        removed_ingredients: body.removed_ingredients,
        payment_method: body.payment_method,
        service_type: body.service_type,
    };

    let sale = state.db.checkout().checkout(request).await?;
    info!(order_code = %sale.order_code, "Sale created");
    Ok((StatusCode::CREATED, Json(sale)))
}

/// `GET /sales`
pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<Sale>>, ApiError> {
    Ok(Json(state.db.sales().list().await?))
}

/// `GET /sales/{id}`
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sale>, ApiError> {
    let sale = state
        .db
        .sales()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &id))?;
    Ok(Json(sale))
}

/// `GET /sales/by-order-code/{code}`
pub async fn get_sale_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Sale>, ApiError> {
    let sale = state
        .db
        .sales()
        .get_by_order_code(&code)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &code))?;
    Ok(Json(sale))
}

/// `PUT /sales/{id}` — administrative edit.
pub async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSaleBody>,
) -> Result<Json<Sale>, ApiError> {
    let sale = state
        .db
        .sales()
        .admin_update(&id, body.status, body.payment_method, body.service_type)
        .await?;
    Ok(Json(sale))
}

/// `DELETE /sales/{id}` — hard delete. Stock is not restored and the order
/// code is never reused.
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.db.sales().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
