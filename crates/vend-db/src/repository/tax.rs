//! # Tax Rate Repository
//!
//! Lookup access to the tax rate table. The initial migration seeds the
//! single flat consumption-tax row; the calculator applies its own fixed
//! rate, so this table only backs the lookup endpoint.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use vend_core::TaxRecord;

/// Repository for tax rate database operations.
#[derive(Debug, Clone)]
pub struct TaxRepository {
    pool: SqlitePool,
}

impl TaxRepository {
    /// Creates a new TaxRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TaxRepository { pool }
    }

    /// Fetches a tax rate by id.
    pub async fn find_by_id(&self, tax_id: i64) -> DbResult<Option<TaxRecord>> {
        debug!(tax_id, "looking up tax rate");

        let record = sqlx::query_as::<_, TaxRecord>(
            r#"
            SELECT tax_id, tax_cd, tax_rate_bps
            FROM tax_rates
            WHERE tax_id = ?1
            "#,
        )
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Inserts a tax rate and returns its generated id.
    pub async fn insert(&self, tax_cd: &str, tax_rate_bps: i64) -> DbResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO tax_rates (tax_cd, tax_rate_bps)
            VALUES (?1, ?2)
            "#,
        )
        .bind(tax_cd)
        .bind(tax_rate_bps)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
