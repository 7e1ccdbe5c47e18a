//! Kitchen display endpoints: the merged active queue and status bumps.

use axum::extract::{Path, State};
use crate::extract::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use ramen_core::{OrderStatus, OrderView};

use crate::error::ApiError;
use crate::events::KitchenEvent;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: OrderStatus,
}

/// `GET /kitchen/orders` — active POS sales and mobile orders, merged and
/// sorted oldest-first.
pub async fn active_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    Ok(Json(state.db.kitchen().active_orders().await?))
}

/// `PATCH /kitchen/orders/{code}/status`
///
/// Routes the update to whichever channel owns the code (POS first), then
/// broadcasts the change to connected kitchen displays.
pub async fn update_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Value>, ApiError> {
    let order = state
        .db
        .kitchen()
        .update_status(&code, body.status)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &code))?;

    info!(order_code = %code, status = ?body.status, "Order status updated");

    state.events.publish(KitchenEvent {
        order_code: order.order_code.clone(),
        status: order.status,
        source_type: order.source,
    });

    Ok(Json(json!({ "success": true, "order": order })))
}
