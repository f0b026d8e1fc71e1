//! # Expense Repository
//!
//! Database operations for expenses. No derived-entity side effect: an
//! expense only matters to the cashbox's daily cash-out sum.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use esnaf_core::Expense;

const EXPENSE_COLUMNS: &str = "id, owner_id, date, description, category, amount_kurus";

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Gets an expense by id, scoped to an owner.
    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> StoreResult<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE owner_id = ?1 AND id = ?2"
        ))
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(expense)
    }

    /// Lists all expenses for an owner, newest first.
    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE owner_id = ?1 ORDER BY date DESC, id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Sums expense amounts within `[start, end)`: the cashbox's daily
    /// cash-out input.
    pub async fn sum_for_range(
        &self,
        owner_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_kurus), 0)
            FROM expenses
            WHERE owner_id = ?1 AND date >= ?2 AND date < ?3
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped writes (composed by the coordinator)
    // -------------------------------------------------------------------------

    /// Inserts an expense row.
    pub async fn insert(conn: &mut SqliteConnection, expense: &Expense) -> StoreResult<()> {
        debug!(id = %expense.id, amount = %expense.amount(), "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (id, owner_id, date, description, category, amount_kurus)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.owner_id)
        .bind(expense.date)
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(expense.amount_kurus)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Overwrites a stored expense's fields.
    pub async fn update(conn: &mut SqliteConnection, expense: &Expense) -> StoreResult<u64> {
        debug!(id = %expense.id, "Updating expense");

        let result = sqlx::query(
            r#"
            UPDATE expenses SET date = ?3, description = ?4, category = ?5, amount_kurus = ?6
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(&expense.owner_id)
        .bind(&expense.id)
        .bind(expense.date)
        .bind(&expense.description)
        .bind(&expense.category)
        .bind(expense.amount_kurus)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes an expense row. Returns affected rows (0 = already gone).
    pub async fn delete(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<u64> {
        debug!(id = %id, "Deleting expense");

        let result = sqlx::query("DELETE FROM expenses WHERE owner_id = ?1 AND id = ?2")
            .bind(owner_id)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new expense id.
pub fn generate_expense_id() -> String {
    Uuid::new_v4().to_string()
}
