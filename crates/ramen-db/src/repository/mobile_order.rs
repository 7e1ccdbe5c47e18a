//! # Mobile Order Repository
//!
//! Orders arriving from the mobile ordering channel. The POS treats them as
//! externally-owned documents: it ingests them, shows them in the kitchen
//! queue and moves their status forward, but never edits their contents.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ramen_core::{MobileOrder, MobileOrderItem, OrderStatus};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MobileOrderRow {
    id: String,
    order_id: String,
    customer_name: Option<String>,
    items: String,
    status: OrderStatus,
    delivery_method: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MobileOrderRow {
    pub(crate) fn into_domain(self) -> DbResult<MobileOrder> {
        let items: Vec<MobileOrderItem> = serde_json::from_str(&self.items)
            .map_err(|e| DbError::corrupt_json("mobile_orders", "items", e))?;

        Ok(MobileOrder {
            id: self.id,
            order_id: self.order_id,
            customer_name: self.customer_name,
            items,
            status: self.status,
            delivery_method: self.delivery_method,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) const MOBILE_ORDER_COLUMNS: &str = "id, order_id, customer_name, items, status, \
     delivery_method, notes, created_at, updated_at";

/// New-order input from the mobile channel.
#[derive(Debug, Clone)]
pub struct NewMobileOrder {
    pub order_id: String,
    pub customer_name: Option<String>,
    pub items: Vec<MobileOrderItem>,
    pub delivery_method: Option<String>,
    pub notes: Option<String>,
}

/// Repository for mobile order database operations.
#[derive(Debug, Clone)]
pub struct MobileOrderRepository {
    pool: SqlitePool,
}

impl MobileOrderRepository {
    /// Creates a new MobileOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MobileOrderRepository { pool }
    }

    /// Lists all mobile orders, newest first.
    pub async fn list(&self) -> DbResult<Vec<MobileOrder>> {
        let rows: Vec<MobileOrderRow> = sqlx::query_as(&format!(
            "SELECT {MOBILE_ORDER_COLUMNS} FROM mobile_orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MobileOrderRow::into_domain).collect()
    }

    /// Gets a mobile order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MobileOrder>> {
        let row: Option<MobileOrderRow> = sqlx::query_as(&format!(
            "SELECT {MOBILE_ORDER_COLUMNS} FROM mobile_orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MobileOrderRow::into_domain).transpose()
    }

    /// Ingests a new order from the mobile channel.
    ///
    /// `order_id` is the channel's own code and must be unique.
    pub async fn insert(&self, input: NewMobileOrder) -> DbResult<MobileOrder> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let items_json = serde_json::to_string(&input.items)
            .map_err(|e| DbError::corrupt_json("mobile_orders", "items", e))?;

        debug!(id = %id, order_id = %input.order_id, "Ingesting mobile order");

        sqlx::query(
            "INSERT INTO mobile_orders \
                 (id, order_id, customer_name, items, status, delivery_method, notes, \
                  created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6, ?7, ?8)",
        )
        .bind(&id)
        .bind(&input.order_id)
        .bind(&input.customer_name)
        .bind(&items_json)
        .bind(&input.delivery_method)
        .bind(&input.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(MobileOrder {
            id,
            order_id: input.order_id,
            customer_name: input.customer_name,
            items: input.items,
            status: OrderStatus::Pending,
            delivery_method: input.delivery_method,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates the status of the mobile order carrying an order code.
    ///
    /// ## Returns
    /// The updated order, or `None` when no order carries the code.
    pub async fn update_status_by_code(
        &self,
        order_code: &str,
        status: OrderStatus,
    ) -> DbResult<Option<MobileOrder>> {
        let now = Utc::now();

        let row: Option<MobileOrderRow> = sqlx::query_as(&format!(
            "UPDATE mobile_orders SET status = ?2, updated_at = ?3 \
             WHERE order_id = ?1 \
             RETURNING {MOBILE_ORDER_COLUMNS}"
        ))
        .bind(order_code)
        .bind(status)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            debug!(order_code, ?status, "Updated mobile order status");
        }

        row.map(MobileOrderRow::into_domain).transpose()
    }

    /// Deletes a mobile order.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM mobile_orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Mobile order", id));
        }

        debug!(id = %id, "Deleted mobile order");
        Ok(())
    }
}
