//! # Kitchen Queue Projection
//!
//! Merges the two order sources into the single queue the kitchen display
//! works from, and routes status updates back to the right table.
//!
//! ## Projection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kitchen Queue                                       │
//! │                                                                         │
//! │  sales                              mobile_orders                       │
//! │  status IN (pending, preparing)     status IN (pending, preparing)     │
//! │  service_type IN (dine-in, takeout)                                    │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  OrderView::from_sale              OrderView::from_mobile               │
//! │       │                                  │                              │
//! │       └──────────────┬───────────────────┘                              │
//! │                      ▼                                                  │
//! │        merge, sort by placed_at ASC (oldest first)                      │
//! │                      ▼                                                  │
//! │        one queue, one schema, a `source` tag                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pickup sales never enter the queue: they're handed straight over the
//! counter. Mobile orders always do, whatever their delivery method.
//!
//! ## Status Routing
//! `update_status(code)` tries the sales table first, and only falls back to
//! mobile orders when no sale carries the code. The two channels number
//! independently, so a code can collide across them; POS wins. The update is
//! not gated on the current status, so an order that already left the queue
//! can still be corrected (a mistaken ready click walked back, say).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::mobile_order::{MobileOrderRow, MOBILE_ORDER_COLUMNS};
use crate::repository::sale::{SaleRow, SALE_COLUMNS};
use ramen_core::{OrderStatus, OrderView};

/// Builds the kitchen queue and routes kitchen status updates.
#[derive(Debug, Clone)]
pub struct KitchenProjector {
    pool: SqlitePool,
}

impl KitchenProjector {
    /// Creates a new KitchenProjector.
    pub fn new(pool: SqlitePool) -> Self {
        KitchenProjector { pool }
    }

    /// Returns all active orders from both sources, oldest first.
    pub async fn active_orders(&self) -> DbResult<Vec<OrderView>> {
        let sale_rows: Vec<SaleRow> = sqlx::query_as(&format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE status IN ('pending', 'preparing') \
               AND service_type IN ('dine-in', 'takeout')"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mobile_rows: Vec<MobileOrderRow> = sqlx::query_as(&format!(
            "SELECT {MOBILE_ORDER_COLUMNS} FROM mobile_orders \
             WHERE status IN ('pending', 'preparing')"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut orders: Vec<OrderView> = Vec::with_capacity(sale_rows.len() + mobile_rows.len());
        for row in sale_rows {
            orders.push(OrderView::from_sale(&row.into_domain()?));
        }
        for row in mobile_rows {
            orders.push(OrderView::from_mobile(&row.into_domain()?));
        }

        orders.sort_by(|a, b| a.placed_at.cmp(&b.placed_at));

        debug!(count = orders.len(), "Projected kitchen queue");
        Ok(orders)
    }

    /// Moves the order carrying `order_code` to `status`.
    ///
    /// Tries POS sales first, then mobile orders. Returns the updated view,
    /// or `None` when no order carries the code.
    pub async fn update_status(
        &self,
        order_code: &str,
        status: OrderStatus,
    ) -> DbResult<Option<OrderView>> {
        let sales = crate::repository::sale::SaleRepository::new(self.pool.clone());
        if let Some(sale) = sales.update_status_by_code(order_code, status).await? {
            return Ok(Some(OrderView::from_sale(&sale)));
        }

        let mobile = crate::repository::mobile_order::MobileOrderRepository::new(self.pool.clone());
        if let Some(order) = mobile.update_status_by_code(order_code, status).await? {
            return Ok(Some(OrderView::from_mobile(&order)));
        }

        Ok(None)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutRequest;
    use crate::pool::{Database, DbConfig};
    use crate::repository::menu::NewMenuItem;
    use crate::repository::mobile_order::NewMobileOrder;
    use ramen_core::{
        MobileOrderItem, OrderSource, PaymentMethod, RecipeIngredient, Sale, ServiceType,
    };

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_ramen(db: &Database) -> String {
        db.inventory().insert("Noodles", 100).await.unwrap();
        db.inventory().insert("Broth", 100).await.unwrap();
        db.menu()
            .insert(NewMenuItem {
                name: "Tonkotsu Ramen".to_string(),
                price_cents: 25000,
                category: "ramen".to_string(),
                image: None,
                ingredients: vec![
                    RecipeIngredient {
                        inventory_item: "Noodles".to_string(),
                        quantity: 2,
                    },
                    RecipeIngredient {
                        inventory_item: "Broth".to_string(),
                        quantity: 1,
                    },
                ],
            })
            .await
            .unwrap()
            .id
    }

    async fn checkout(db: &Database, menu_item_id: &str, service_type: ServiceType) -> Sale {
        db.checkout()
            .checkout(CheckoutRequest {
                menu_item_id: menu_item_id.to_string(),
                quantity: 1,
                add_ons: vec![],
                removed_ingredients: vec![],
                payment_method: PaymentMethod::Cash,
                service_type,
            })
            .await
            .unwrap()
    }

    fn mobile_order(order_id: &str) -> NewMobileOrder {
        NewMobileOrder {
            order_id: order_id.to_string(),
            customer_name: Some("Mika".to_string()),
            items: vec![MobileOrderItem {
                name: "Shoyu Ramen".to_string(),
                price_cents: 22000,
                quantity: 1,
                selected_add_ons: vec![],
            }],
            delivery_method: Some("pickup".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_queue_merges_both_sources_oldest_first() {
        let db = test_db().await;
        let ramen = seed_ramen(&db).await;

        let pos_sale = checkout(&db, &ramen, ServiceType::DineIn).await;
        db.mobile_orders().insert(mobile_order("M-0042")).await.unwrap();

        let queue = db.kitchen().active_orders().await.unwrap();
        assert_eq!(queue.len(), 2);
        // Checkout ran first, so the POS sale is older.
        assert_eq!(queue[0].order_code, pos_sale.order_code);
        assert_eq!(queue[0].source, OrderSource::Pos);
        assert_eq!(queue[1].order_code, "M-0042");
        assert_eq!(queue[1].source, OrderSource::Mobile);
        assert_eq!(queue[1].customer_label, "Mika");
        assert!(queue[0].placed_at <= queue[1].placed_at);
    }

    #[tokio::test]
    async fn test_pickup_sales_never_enter_the_queue() {
        let db = test_db().await;
        let ramen = seed_ramen(&db).await;

        checkout(&db, &ramen, ServiceType::Pickup).await;
        let queue = db.kitchen().active_orders().await.unwrap();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_ready_orders_leave_the_queue() {
        let db = test_db().await;
        let ramen = seed_ramen(&db).await;

        let sale = checkout(&db, &ramen, ServiceType::Takeout).await;
        db.kitchen()
            .update_status(&sale.order_code, OrderStatus::Ready)
            .await
            .unwrap()
            .unwrap();

        assert!(db.kitchen().active_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ready_order_can_still_be_updated() {
        // Leaving the queue doesn't freeze an order's status: a mistaken
        // ready click can be walked back, and the order re-enters the queue.
        let db = test_db().await;
        let ramen = seed_ramen(&db).await;

        let sale = checkout(&db, &ramen, ServiceType::DineIn).await;
        db.kitchen()
            .update_status(&sale.order_code, OrderStatus::Ready)
            .await
            .unwrap()
            .unwrap();

        let updated = db
            .kitchen()
            .update_status(&sale.order_code, OrderStatus::Preparing)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);

        let queue = db.kitchen().active_orders().await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].order_code, sale.order_code);
    }

    #[tokio::test]
    async fn test_preparing_mobile_order_stays_in_queue() {
        let db = test_db().await;
        db.mobile_orders().insert(mobile_order("M-0042")).await.unwrap();

        db.kitchen()
            .update_status("M-0042", OrderStatus::Preparing)
            .await
            .unwrap()
            .unwrap();

        let queue = db.kitchen().active_orders().await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].order_code, "M-0042");
        assert_eq!(queue[0].source, OrderSource::Mobile);
        assert_eq!(queue[0].status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_status_update_prefers_pos_on_code_collision() {
        let db = test_db().await;
        let ramen = seed_ramen(&db).await;

        // POS sale gets "0001"; give a mobile order the same code.
        let sale = checkout(&db, &ramen, ServiceType::DineIn).await;
        assert_eq!(sale.order_code, "0001");
        db.mobile_orders().insert(mobile_order("0001")).await.unwrap();

        let updated = db
            .kitchen()
            .update_status("0001", OrderStatus::Preparing)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.source, OrderSource::Pos);

        // The mobile order is untouched.
        let queue = db.kitchen().active_orders().await.unwrap();
        let mobile = queue.iter().find(|o| o.source == OrderSource::Mobile).unwrap();
        assert_eq!(mobile.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_status_update_falls_back_to_mobile() {
        let db = test_db().await;
        db.mobile_orders().insert(mobile_order("M-0042")).await.unwrap();

        let updated = db
            .kitchen()
            .update_status("M-0042", OrderStatus::Preparing)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.source, OrderSource::Mobile);
        assert_eq!(updated.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_status_update_unknown_code_returns_none() {
        let db = test_db().await;
        let result = db
            .kitchen()
            .update_status("9999", OrderStatus::Ready)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
