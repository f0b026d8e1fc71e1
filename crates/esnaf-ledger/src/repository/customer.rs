//! # Customer Repository
//!
//! Database operations for customer accounts.
//!
//! `balance_kurus` is a derived field: the only writes touching it are
//! `apply_balance_delta` / `set_balance`, and both are transaction-scoped
//! so the coordinator can pair them with the order write that justifies
//! them. Direct balance edits from anywhere else are a bug.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use esnaf_core::{Customer, Money};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by id, scoped to an owner.
    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> StoreResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, owner_id, name, email, balance_kurus, created_at
            FROM customers
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers for an owner, sorted by name.
    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, owner_id, name, email, balance_kurus, created_at
            FROM customers
            WHERE owner_id = ?1
            ORDER BY name, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped writes (composed by the coordinator)
    // -------------------------------------------------------------------------

    /// Inserts a customer row.
    pub async fn insert(conn: &mut SqliteConnection, customer: &Customer) -> StoreResult<()> {
        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, owner_id, name, email, balance_kurus, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.owner_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.balance_kurus)
        .bind(customer.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Updates name/email. Never touches the balance.
    ///
    /// Returns the number of affected rows (0 when the customer is gone).
    pub async fn update_profile(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
        name: &str,
        email: Option<&str>,
    ) -> StoreResult<u64> {
        debug!(id = %id, "Updating customer profile");

        let result = sqlx::query(
            r#"
            UPDATE customers SET name = ?3, email = ?4
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(name)
        .bind(email)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Applies a signed delta to the balance (relative update).
    ///
    /// ## Why Relative?
    /// `SET balance = balance + ?` keeps the invariant additive: two
    /// operations applied in either order produce the same balance, and
    /// the delta is exactly the order total the same transaction writes.
    ///
    /// Returns the number of affected rows (0 when the customer is gone).
    pub async fn apply_balance_delta(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
        delta: Money,
    ) -> StoreResult<u64> {
        debug!(id = %id, delta = %delta, "Applying balance delta");

        let result = sqlx::query(
            r#"
            UPDATE customers SET balance_kurus = balance_kurus + ?3
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(delta.kurus())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Full manual balance override. The one sanctioned bypass of the
    /// derived-sum rule; the UI gates it behind an explicit confirmation.
    pub async fn set_balance(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
        balance: Money,
    ) -> StoreResult<u64> {
        debug!(id = %id, balance = %balance, "Overriding balance");

        let result = sqlx::query(
            r#"
            UPDATE customers SET balance_kurus = ?3
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .bind(balance.kurus())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a customer row. Returns affected rows (0 = already gone).
    pub async fn delete(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<u64> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE owner_id = ?1 AND id = ?2")
            .bind(owner_id)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new customer id.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}
