//! # Order Repository
//!
//! Database operations for orders (credit sales, cash sales, payments).
//!
//! ## Snapshot Pattern
//! `customer_name` is copied onto the order at write time. It preserves
//! listing history even if the customer is renamed later; staleness is
//! accepted behavior.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use esnaf_core::{Order, PaymentMethod};

const ORDER_COLUMNS: &str = "id, owner_id, customer_id, customer_name, description, items, \
                             total_kurus, status, date, payment_method";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order by id, scoped to an owner.
    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> StoreResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE owner_id = ?1 AND id = ?2"
        ))
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Lists all orders for an owner, newest first.
    ///
    /// The `id` tiebreaker makes repeated reads of unchanged data return
    /// the same ordering (subscription re-reads must be idempotent).
    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE owner_id = ?1 ORDER BY date DESC, id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Lists one customer's orders, newest first.
    pub async fn list_for_customer(
        &self,
        owner_id: &str,
        customer_id: &str,
    ) -> StoreResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE owner_id = ?1 AND customer_id = ?2 ORDER BY date DESC, id"
        ))
        .bind(owner_id)
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Sums `|total|` over completed orders of one payment method within
    /// `[start, end)`. This is the cashbox's cash-in / card-in input.
    pub async fn sum_completed_abs_total(
        &self,
        owner_id: &str,
        method: PaymentMethod,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(ABS(total_kurus)), 0)
            FROM orders
            WHERE owner_id = ?1
              AND status = 'completed'
              AND payment_method = ?2
              AND date >= ?3 AND date < ?4
            "#,
        )
        .bind(owner_id)
        .bind(method)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped writes (composed by the coordinator)
    // -------------------------------------------------------------------------

    /// Inserts an order row.
    pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> StoreResult<()> {
        debug!(id = %order.id, total = %order.total(), "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, owner_id, customer_id, customer_name, description, items,
                total_kurus, status, date, payment_method
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.owner_id)
        .bind(&order.customer_id)
        .bind(&order.customer_name)
        .bind(&order.description)
        .bind(order.items)
        .bind(order.total_kurus)
        .bind(order.status)
        .bind(order.date)
        .bind(order.payment_method)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Overwrites a stored order's fields.
    pub async fn update(conn: &mut SqliteConnection, order: &Order) -> StoreResult<u64> {
        debug!(id = %order.id, total = %order.total(), "Updating order");

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                customer_id = ?3,
                customer_name = ?4,
                description = ?5,
                items = ?6,
                total_kurus = ?7,
                status = ?8,
                date = ?9,
                payment_method = ?10
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(&order.owner_id)
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(&order.customer_name)
        .bind(&order.description)
        .bind(order.items)
        .bind(order.total_kurus)
        .bind(order.status)
        .bind(order.date)
        .bind(order.payment_method)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes an order row. Returns affected rows (0 = already gone).
    pub async fn delete(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<u64> {
        debug!(id = %id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE owner_id = ?1 AND id = ?2")
            .bind(owner_id)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes all orders of one customer (cascade step of
    /// `delete_customer`). Returns the number of rows removed.
    pub async fn delete_for_customer(
        conn: &mut SqliteConnection,
        owner_id: &str,
        customer_id: &str,
    ) -> StoreResult<u64> {
        debug!(customer_id = %customer_id, "Cascade-deleting customer orders");

        let result = sqlx::query("DELETE FROM orders WHERE owner_id = ?1 AND customer_id = ?2")
            .bind(owner_id)
            .bind(customer_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new order id.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}
