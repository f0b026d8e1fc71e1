//! # Product Repository
//!
//! Database operations for products.
//!
//! `stock_qty` is the derived field here: it only moves through
//! `apply_stock_delta`, paired in one transaction with the stock
//! adjustment row that justifies the movement.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use esnaf_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by id, scoped to an owner.
    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, owner_id, name, kind, stock_qty, price_kurus, cost_kurus,
                   low_stock_threshold, created_at
            FROM products
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products for an owner, sorted by name.
    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, owner_id, name, kind, stock_qty, price_kurus, cost_kurus,
                   low_stock_threshold, created_at
            FROM products
            WHERE owner_id = ?1
            ORDER BY name, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped writes (composed by the coordinator)
    // -------------------------------------------------------------------------

    /// Inserts a product row. Stock is seeded at 0; opening stock arrives
    /// as a purchase adjustment so the stock invariant holds from day one.
    pub async fn insert(conn: &mut SqliteConnection, product: &Product) -> StoreResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, owner_id, name, kind, stock_qty, price_kurus, cost_kurus,
                low_stock_threshold, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.owner_id)
        .bind(&product.name)
        .bind(product.kind)
        .bind(product.stock_qty)
        .bind(product.price_kurus)
        .bind(product.cost_kurus)
        .bind(product.low_stock_threshold)
        .bind(product.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Updates catalog fields. Never touches `stock_qty`.
    pub async fn update_catalog(
        conn: &mut SqliteConnection,
        product: &Product,
    ) -> StoreResult<u64> {
        debug!(id = %product.id, "Updating product catalog fields");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?3,
                kind = ?4,
                price_kurus = ?5,
                cost_kurus = ?6,
                low_stock_threshold = ?7
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(&product.owner_id)
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.kind)
        .bind(product.price_kurus)
        .bind(product.cost_kurus)
        .bind(product.low_stock_threshold)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Applies a signed delta to the stock level (relative update).
    ///
    /// Negative results are allowed: oversold stock is an alert, not an
    /// error. Returns affected rows (0 when the product is gone).
    pub async fn apply_stock_delta(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
        delta: i64,
    ) -> StoreResult<u64> {
        debug!(id = %id, delta = %delta, "Applying stock delta");

        let result = sqlx::query(
            r#"
            UPDATE products SET stock_qty = stock_qty + ?3
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(delta)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a product row. Returns affected rows (0 = already gone).
    pub async fn delete(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<u64> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE owner_id = ?1 AND id = ?2")
            .bind(owner_id)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new product id.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
