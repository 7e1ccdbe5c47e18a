//! # Sale Repository
//!
//! Reads, status updates and deletion for POS sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CHECKOUT (crate::checkout)                                         │
//! │     └── One transaction: order code + stock deduction + insert         │
//! │         Sale { status: Pending }                                       │
//! │                                                                         │
//! │  2. KITCHEN PROGRESSION                                                │
//! │     └── update_status() → Preparing → Ready                            │
//! │                                                                         │
//! │  3. (ADMIN) DELETE                                                     │
//! │     └── delete() — order codes are never reclaimed                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inserts happen exclusively inside the checkout transaction; there is no
//! standalone insert here on purpose.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use ramen_core::{OrderStatus, PaymentMethod, RemovedIngredient, Sale, SaleAddOn, ServiceType};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SaleRow {
    id: String,
    order_code: String,
    menu_item_id: String,
    name_snapshot: String,
    quantity: i64,
    unit_price_cents: i64,
    add_ons: String,
    removed_ingredients: String,
    payment_method: PaymentMethod,
    service_type: ServiceType,
    total_cents: i64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    pub(crate) fn into_domain(self) -> DbResult<Sale> {
        let add_ons: Vec<SaleAddOn> = serde_json::from_str(&self.add_ons)
            .map_err(|e| DbError::corrupt_json("sales", "add_ons", e))?;
        let removed_ingredients: Vec<RemovedIngredient> =
            serde_json::from_str(&self.removed_ingredients)
                .map_err(|e| DbError::corrupt_json("sales", "removed_ingredients", e))?;

        Ok(Sale {
            id: self.id,
            order_code: self.order_code,
            menu_item_id: self.menu_item_id,
            name_snapshot: self.name_snapshot,
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
            add_ons,
            removed_ingredients,
            payment_method: self.payment_method,
            service_type: self.service_type,
            total_cents: self.total_cents,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) const SALE_COLUMNS: &str = "id, order_code, menu_item_id, name_snapshot, quantity, \
     unit_price_cents, add_ons, removed_ingredients, payment_method, service_type, \
     total_cents, status, created_at, updated_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleRow::into_domain).collect()
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> =
            sqlx::query_as(&format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(SaleRow::into_domain).transpose()
    }

    /// Gets the most recent sale carrying an order code.
    ///
    /// Codes restart from the counter seed only when the counter itself is
    /// reset, so in practice this is unique; `ORDER BY created_at DESC`
    /// guards the reset case.
    pub async fn get_by_order_code(&self, order_code: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE order_code = ?1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(order_code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SaleRow::into_domain).transpose()
    }

    /// Updates the status of the most recent sale carrying an order code.
    ///
    /// Any status is fair game, so a ready order can still move to
    /// completed after it has left the kitchen queue.
    ///
    /// ## Returns
    /// The updated sale, or `None` when no sale carries the code.
    pub async fn update_status_by_code(
        &self,
        order_code: &str,
        status: OrderStatus,
    ) -> DbResult<Option<Sale>> {
        let now = Utc::now();

        let row: Option<SaleRow> = sqlx::query_as(&format!(
            "UPDATE sales SET status = ?2, updated_at = ?3 \
             WHERE id = (SELECT id FROM sales \
                         WHERE order_code = ?1 \
                         ORDER BY created_at DESC LIMIT 1) \
             RETURNING {SALE_COLUMNS}"
        ))
        .bind(order_code)
        .bind(status)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            debug!(order_code, ?status, "Updated sale status");
        }

        row.map(SaleRow::into_domain).transpose()
    }

    /// Updates a sale's status by ID.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> DbResult<Sale> {
        let now = Utc::now();

        let result = sqlx::query("UPDATE sales SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Administrative edit: patches status / payment method / service type.
    ///
    /// Sales are otherwise immutable; snapshots and totals never change.
    pub async fn admin_update(
        &self,
        id: &str,
        status: Option<OrderStatus>,
        payment_method: Option<PaymentMethod>,
        service_type: Option<ServiceType>,
    ) -> DbResult<Sale> {
        let current = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;
        let now = Utc::now();

        sqlx::query(
            "UPDATE sales SET status = ?2, payment_method = ?3, service_type = ?4, \
             updated_at = ?5 WHERE id = ?1",
        )
        .bind(id)
        .bind(status.unwrap_or(current.status))
        .bind(payment_method.unwrap_or(current.payment_method))
        .bind(service_type.unwrap_or(current.service_type))
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))
    }

    /// Deletes a sale.
    ///
    /// Stock is NOT restored and the order code is never reused; the
    /// counter only moves forward.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        debug!(id = %id, "Deleted sale");
        Ok(())
    }
}
