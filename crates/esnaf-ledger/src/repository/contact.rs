//! # Supplier / Staff Repositories
//!
//! Flat contact records with no derived invariants. Plain CRUD; writes
//! still go through connection-scoped functions so the coordinator can
//! keep one code path (and one change-feed publish) for every mutation.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreResult;
use esnaf_core::{StaffMember, Supplier};

// =============================================================================
// Suppliers
// =============================================================================

/// Repository for supplier records.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> StoreResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, owner_id, name, phone, product_kinds, created_at
            FROM suppliers
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, owner_id, name, phone, product_kinds, created_at
            FROM suppliers
            WHERE owner_id = ?1
            ORDER BY name, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn insert(conn: &mut SqliteConnection, supplier: &Supplier) -> StoreResult<()> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (id, owner_id, name, phone, product_kinds, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.owner_id)
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.product_kinds)
        .bind(supplier.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn update(conn: &mut SqliteConnection, supplier: &Supplier) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers SET name = ?3, phone = ?4, product_kinds = ?5
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(&supplier.owner_id)
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.phone)
        .bind(&supplier.product_kinds)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM suppliers WHERE owner_id = ?1 AND id = ?2")
            .bind(owner_id)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Staff
// =============================================================================

/// Repository for staff member records.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    pub async fn get_by_id(&self, owner_id: &str, id: &str) -> StoreResult<Option<StaffMember>> {
        let staff = sqlx::query_as::<_, StaffMember>(
            r#"
            SELECT id, owner_id, name, role, phone, created_at
            FROM staff_members
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn list(&self, owner_id: &str) -> StoreResult<Vec<StaffMember>> {
        let staff = sqlx::query_as::<_, StaffMember>(
            r#"
            SELECT id, owner_id, name, role, phone, created_at
            FROM staff_members
            WHERE owner_id = ?1
            ORDER BY name, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn insert(conn: &mut SqliteConnection, staff: &StaffMember) -> StoreResult<()> {
        debug!(id = %staff.id, name = %staff.name, "Inserting staff member");

        sqlx::query(
            r#"
            INSERT INTO staff_members (id, owner_id, name, role, phone, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.owner_id)
        .bind(&staff.name)
        .bind(&staff.role)
        .bind(&staff.phone)
        .bind(staff.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn update(conn: &mut SqliteConnection, staff: &StaffMember) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE staff_members SET name = ?3, role = ?4, phone = ?5
            WHERE owner_id = ?1 AND id = ?2
            "#,
        )
        .bind(&staff.owner_id)
        .bind(&staff.id)
        .bind(&staff.name)
        .bind(&staff.role)
        .bind(&staff.phone)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(
        conn: &mut SqliteConnection,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM staff_members WHERE owner_id = ?1 AND id = ?2")
            .bind(owner_id)
            .bind(id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Helper to generate a new contact id.
pub fn generate_contact_id() -> String {
    Uuid::new_v4().to_string()
}
