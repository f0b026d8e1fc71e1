//! # Cashbox Repository
//!
//! Database operations for day-close records. Append-only by convention:
//! the only update path is the explicit entry edit, which re-derives the
//! variance and nothing else.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use esnaf_core::CashboxEntry;

const CASHBOX_COLUMNS: &str = "id, owner_id, date, opening_cash_kurus, cash_in_kurus, \
                               card_in_kurus, cash_out_kurus, expected_cash_kurus, \
                               counted_cash_kurus, counted_card_kurus, cash_difference_kurus";

/// Repository for cashbox entry database operations.
#[derive(Debug, Clone)]
pub struct CashboxRepository {
    pool: SqlitePool,
}

impl CashboxRepository {
    /// Creates a new CashboxRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashboxRepository { pool }
    }

    /// Gets an entry by id, scoped to an owner.
    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> StoreResult<Option<CashboxEntry>> {
        let entry = sqlx::query_as::<_, CashboxEntry>(&format!(
            "SELECT {CASHBOX_COLUMNS} FROM cashbox_entries WHERE owner_id = ?1 AND id = ?2"
        ))
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// The most recent entry; its counted cash is the next day's opening.
    pub async fn latest(&self, owner_id: &str) -> StoreResult<Option<CashboxEntry>> {
        let entry = sqlx::query_as::<_, CashboxEntry>(&format!(
            "SELECT {CASHBOX_COLUMNS} FROM cashbox_entries \
             WHERE owner_id = ?1 ORDER BY date DESC, id DESC LIMIT 1"
        ))
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists all entries for an owner, newest first.
    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<CashboxEntry>> {
        let entries = sqlx::query_as::<_, CashboxEntry>(&format!(
            "SELECT {CASHBOX_COLUMNS} FROM cashbox_entries \
             WHERE owner_id = ?1 ORDER BY date DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // -------------------------------------------------------------------------
    // Transaction-scoped writes (composed by the coordinator)
    // -------------------------------------------------------------------------

    /// Appends one day-close record.
    pub async fn insert(conn: &mut SqliteConnection, entry: &CashboxEntry) -> StoreResult<()> {
        debug!(
            id = %entry.id,
            expected = %entry.expected_cash(),
            difference = %entry.cash_difference(),
            "Appending cashbox entry"
        );

        sqlx::query(
            r#"
            INSERT INTO cashbox_entries (
                id, owner_id, date, opening_cash_kurus, cash_in_kurus, card_in_kurus,
                cash_out_kurus, expected_cash_kurus, counted_cash_kurus,
                counted_card_kurus, cash_difference_kurus
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.owner_id)
        .bind(entry.date)
        .bind(entry.opening_cash_kurus)
        .bind(entry.cash_in_kurus)
        .bind(entry.card_in_kurus)
        .bind(entry.cash_out_kurus)
        .bind(entry.expected_cash_kurus)
        .bind(entry.counted_cash_kurus)
        .bind(entry.counted_card_kurus)
        .bind(entry.cash_difference_kurus)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Overwrites a stored entry (the edit path).
    pub async fn update(conn: &mut SqliteConnection, entry: &CashboxEntry) -> StoreResult<u64> {
        debug!(id = %entry.id, "Updating cashbox entry");

        let result = sqlx::query(
            r#"
            UPDATE cashbox_entries SET
                date = ?3,
                opening_cash_kurus = ?4,
                cash_in_kurus = ?5,
                card_in_kurus = ?6,
                cash_out_kurus = ?7,
                expected_cash_kurus = ?8,
                counted_cash_kurus = ?9,
                counted_card_kurus = ?10,
                cash_difference_kurus = ?11
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(&entry.owner_id)
        .bind(&entry.id)
        .bind(entry.date)
        .bind(entry.opening_cash_kurus)
        .bind(entry.cash_in_kurus)
        .bind(entry.card_in_kurus)
        .bind(entry.cash_out_kurus)
        .bind(entry.expected_cash_kurus)
        .bind(entry.counted_cash_kurus)
        .bind(entry.counted_card_kurus)
        .bind(entry.cash_difference_kurus)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new cashbox entry id.
pub fn generate_cashbox_entry_id() -> String {
    Uuid::new_v4().to_string()
}
