//! # HTTP Routes
//!
//! ## Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales                                                                  │
//! │    POST   /sales                      checkout (201)                    │
//! │    GET    /sales                      list, newest first                │
//! │    GET    /sales/{id}                                                   │
//! │    GET    /sales/by-order-code/{code}                                   │
//! │    PUT    /sales/{id}                 admin edit (status/payment/svc)   │
//! │    DELETE /sales/{id}                 hard delete                       │
//! │                                                                         │
//! │  Kitchen                                                                │
//! │    GET    /kitchen/orders             merged active queue               │
//! │    PATCH  /kitchen/orders/{code}/status                                 │
//! │    GET    /kitchen/events             WebSocket event feed              │
//! │                                                                         │
//! │  Menu                                                                   │
//! │    GET    /menu             GET /menu/add-ons    GET /menu/with-stock   │
//! │    GET    /menu/category/{category}              GET /menu/{id}         │
//! │    POST   /menu             PUT /menu/{id}       DELETE /menu/{id}      │
//! │                                                                         │
//! │  Inventory                                                              │
//! │    GET    /inventory        POST /inventory                             │
//! │    PATCH  /inventory/{id}   DELETE /inventory/{id}                      │
//! │                                                                         │
//! │  GET /health                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
pub mod kitchen;
pub mod menu;
pub mod sales;

use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;

use crate::events;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Sales
        .route("/sales", post(sales::create_sale).get(sales::list_sales))
        .route("/sales/by-order-code/{code}", get(sales::get_sale_by_code))
        .route(
            "/sales/{id}",
            get(sales::get_sale)
                .put(sales::update_sale)
                .delete(sales::delete_sale),
        )
        // Kitchen
        .route("/kitchen/orders", get(kitchen::active_orders))
        .route(
            "/kitchen/orders/{code}/status",
            patch(kitchen::update_status),
        )
        .route("/kitchen/events", get(events::ws_handler))
        // Menu
        .route("/menu", get(menu::list_menu).post(menu::create_menu_item))
        .route("/menu/add-ons", get(menu::list_add_ons))
        .route("/menu/with-stock", get(menu::list_menu_with_stock))
        .route("/menu/category/{category}", get(menu::list_by_category))
        .route(
            "/menu/{id}",
            get(menu::get_menu_item)
                .put(menu::update_menu_item)
                .delete(menu::delete_menu_item),
        )
        // Inventory
        .route(
            "/inventory",
            get(inventory::list_inventory).post(inventory::create_inventory_item),
        )
        .route(
            "/inventory/{id}",
            patch(inventory::set_stock).delete(inventory::delete_inventory_item),
        )
        // Health
        .route("/health", get(health))
        .with_state(state)
}

/// Health check endpoint.
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl IntoResponse {
    let db_ok = state.db.health_check().await;
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
    }))
}
