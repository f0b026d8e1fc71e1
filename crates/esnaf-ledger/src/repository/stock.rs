//! # Stock Adjustment Repository
//!
//! Database operations for stock adjustments. Same snapshot pattern as
//! orders: `product_name` is frozen at write time.
//!
//! Note the documented asymmetry relative to orders: `update_fields`
//! deliberately does NOT reverse the prior quantity's effect on stock
//! before the new value lands — callers treat stock drift from "update
//! quantity" as a known limitation of the reference behavior.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use esnaf_core::StockAdjustment;

const ADJUSTMENT_COLUMNS: &str =
    "id, owner_id, product_id, product_name, quantity, description, category, date";

/// Repository for stock adjustment database operations.
#[derive(Debug, Clone)]
pub struct StockAdjustmentRepository {
    pool: SqlitePool,
}

impl StockAdjustmentRepository {
    /// Creates a new StockAdjustmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockAdjustmentRepository { pool }
    }

    /// Gets an adjustment by id, scoped to an owner.
    pub async fn get_by_id(
        &self,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<Option<StockAdjustment>> {
        let adjustment = sqlx::query_as::<_, StockAdjustment>(&format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM stock_adjustments WHERE owner_id = ?1 AND id = ?2"
        ))
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(adjustment)
    }

    /// Lists all adjustments for an owner, newest first.
    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<StockAdjustment>> {
        let adjustments = sqlx::query_as::<_, StockAdjustment>(&format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM stock_adjustments \
             WHERE owner_id = ?1 ORDER BY date DESC, id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(adjustments)
    }

    /// Lists one product's adjustments, newest first.
    pub async fn list_for_product(
        &self,
        owner_id: &str,
        product_id: &str,
    ) -> StoreResult<Vec<StockAdjustment>> {
        let adjustments = sqlx::query_as::<_, StockAdjustment>(&format!(
            "SELECT {ADJUSTMENT_COLUMNS} FROM stock_adjustments \
             WHERE owner_id = ?1 AND product_id = ?2 ORDER BY date DESC, id"
        ))
        .bind(owner_id)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(adjustments)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped writes (composed by the coordinator)
    // -------------------------------------------------------------------------

    /// Inserts an adjustment row.
    pub async fn insert(
        conn: &mut SqliteConnection,
        adjustment: &StockAdjustment,
    ) -> StoreResult<()> {
        debug!(
            id = %adjustment.id,
            product_id = %adjustment.product_id,
            quantity = %adjustment.quantity,
            "Inserting stock adjustment"
        );

        sqlx::query(
            r#"
            INSERT INTO stock_adjustments (
                id, owner_id, product_id, product_name, quantity, description,
                category, date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&adjustment.id)
        .bind(&adjustment.owner_id)
        .bind(&adjustment.product_id)
        .bind(&adjustment.product_name)
        .bind(adjustment.quantity)
        .bind(&adjustment.description)
        .bind(adjustment.category)
        .bind(adjustment.date)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Overwrites a stored adjustment's fields. No stock side effect here;
    /// see the module docs for why.
    pub async fn update_fields(
        conn: &mut SqliteConnection,
        adjustment: &StockAdjustment,
    ) -> StoreResult<u64> {
        debug!(id = %adjustment.id, "Updating stock adjustment fields");

        let result = sqlx::query(
            r#"
            UPDATE stock_adjustments SET
                quantity = ?3,
                description = ?4,
                category = ?5,
                date = ?6
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(&adjustment.owner_id)
        .bind(&adjustment.id)
        .bind(adjustment.quantity)
        .bind(&adjustment.description)
        .bind(adjustment.category)
        .bind(adjustment.date)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes an adjustment row. Returns affected rows (0 = already gone).
    pub async fn delete(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<u64> {
        debug!(id = %id, "Deleting stock adjustment");

        let result = sqlx::query("DELETE FROM stock_adjustments WHERE owner_id = ?1 AND id = ?2")
            .bind(owner_id)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes all adjustments of one product (cascade step of
    /// `delete_product`). Returns the number of rows removed.
    pub async fn delete_for_product(
        conn: &mut SqliteConnection,
        owner_id: &str,
        product_id: &str,
    ) -> StoreResult<u64> {
        debug!(product_id = %product_id, "Cascade-deleting product adjustments");

        let result =
            sqlx::query("DELETE FROM stock_adjustments WHERE owner_id = ?1 AND product_id = ?2")
                .bind(owner_id)
                .bind(product_id)
                .execute(conn)
                .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new adjustment id.
pub fn generate_adjustment_id() -> String {
    Uuid::new_v4().to_string()
}
