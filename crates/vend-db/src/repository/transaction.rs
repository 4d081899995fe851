//! # Transaction Repository
//!
//! Database operations for purchase headers and per-unit detail rows.
//!
//! ## Purchase Lifecycle
//! ```text
//! 1. CREATE HEADER
//!    └── create() → trd_id, amounts = 0
//!
//! 2. RECORD DETAILS
//!    └── insert_detail() per purchased unit
//!
//! 3. FINALIZE
//!    └── update_amounts() → totals written exactly once
//!
//! (on failure after step 1: delete() removes details then header)
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use vend_core::{NewDetail, NewTransaction, Transaction, TransactionDetail};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Inserts a transaction header with zero amounts and returns the
    /// generated trd_id.
    pub async fn create(&self, header: &NewTransaction) -> DbResult<i64> {
        debug!(emp_cd = %header.emp_cd, store_cd = %header.store_cd, "creating transaction header");

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (datetime, emp_cd, store_cd, pos_no, total_amt, ttl_amt_ex_tax)
            VALUES (?1, ?2, ?3, ?4, 0, 0)
            "#,
        )
        .bind(header.datetime)
        .bind(&header.emp_cd)
        .bind(&header.store_cd)
        .bind(&header.pos_no)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts one detail row.
    ///
    /// dtl_id carries whatever unit index the caller assigned; the table
    /// enforces no uniqueness on (trd_id, dtl_id).
    pub async fn insert_detail(&self, row: &NewDetail) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transaction_details (trd_id, dtl_id, prd_id, prd_code, prd_name, prd_price, tax_cd)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(row.trd_id)
        .bind(row.dtl_id)
        .bind(row.prd_id)
        .bind(row.prd_code)
        .bind(&row.prd_name)
        .bind(row.prd_price)
        .bind(&row.tax_cd)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes the final amounts onto a header.
    ///
    /// Fails with NotFound when the header does not exist - an update that
    /// silently touches zero rows would hide a lost purchase.
    pub async fn update_amounts(
        &self,
        trd_id: i64,
        total_amt: i64,
        ttl_amt_ex_tax: i64,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET total_amt = ?2, ttl_amt_ex_tax = ?3
            WHERE trd_id = ?1
            "#,
        )
        .bind(trd_id)
        .bind(total_amt)
        .bind(ttl_amt_ex_tax)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("transaction", trd_id));
        }

        Ok(())
    }

    /// Removes a transaction and its detail rows (compensation path).
    ///
    /// Details go first to satisfy the foreign key. Deleting a header that
    /// never got details is fine; deleting a missing header is a no-op.
    pub async fn delete(&self, trd_id: i64) -> DbResult<()> {
        debug!(trd_id, "deleting transaction and details");

        sqlx::query("DELETE FROM transaction_details WHERE trd_id = ?1")
            .bind(trd_id)
            .execute(&self.pool)
            .await?;

        sqlx::query("DELETE FROM transactions WHERE trd_id = ?1")
            .bind(trd_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fetches a header by id.
    pub async fn get_by_id(&self, trd_id: i64) -> DbResult<Option<Transaction>> {
        let tx = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT trd_id, datetime, emp_cd, store_cd, pos_no, total_amt, ttl_amt_ex_tax
            FROM transactions
            WHERE trd_id = ?1
            "#,
        )
        .bind(trd_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    /// Fetches all detail rows for a transaction in insertion order.
    pub async fn list_details(&self, trd_id: i64) -> DbResult<Vec<TransactionDetail>> {
        let rows = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT trd_id, dtl_id, prd_id, prd_code, prd_name, prd_price, tax_cd
            FROM transaction_details
            WHERE trd_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(trd_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn header() -> NewTransaction {
        NewTransaction {
            datetime: Utc::now(),
            emp_cd: "9999999999".to_string(),
            store_cd: "30".to_string(),
            pos_no: "90".to_string(),
        }
    }

    fn detail(trd_id: i64, dtl_id: i64, prd_id: i64) -> NewDetail {
        NewDetail {
            trd_id,
            dtl_id,
            prd_id,
            prd_code: 100 + prd_id,
            prd_name: format!("product-{prd_id}"),
            prd_price: 500,
            tax_cd: "10".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_with_zero_amounts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.transactions();

        let trd_id = repo.create(&header()).await.unwrap();
        let tx = repo.get_by_id(trd_id).await.unwrap().unwrap();

        assert_eq!(tx.total_amt, 0);
        assert_eq!(tx.ttl_amt_ex_tax, 0);
        assert_eq!(tx.emp_cd, "9999999999");
        assert_eq!(tx.store_cd, "30");
        assert_eq!(tx.pos_no, "90");
    }

    #[tokio::test]
    async fn test_details_allow_repeated_dtl_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.transactions();
        let trd_id = repo.create(&header()).await.unwrap();

        // Two distinct cart items both start their unit index at 1.
        repo.insert_detail(&detail(trd_id, 1, 1)).await.unwrap();
        repo.insert_detail(&detail(trd_id, 2, 1)).await.unwrap();
        repo.insert_detail(&detail(trd_id, 1, 2)).await.unwrap();

        let rows = repo.list_details(trd_id).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.dtl_id).collect::<Vec<_>>(),
            vec![1, 2, 1]
        );
    }

    #[tokio::test]
    async fn test_detail_requires_existing_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .transactions()
            .insert_detail(&detail(12345, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_amounts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.transactions();
        let trd_id = repo.create(&header()).await.unwrap();

        repo.update_amounts(trd_id, 2750, 2500).await.unwrap();

        let tx = repo.get_by_id(trd_id).await.unwrap().unwrap();
        assert_eq!(tx.total_amt, 2750);
        assert_eq!(tx.ttl_amt_ex_tax, 2500);
    }

    #[tokio::test]
    async fn test_update_amounts_missing_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .transactions()
            .update_amounts(9999, 100, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_details_and_header() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.transactions();
        let trd_id = repo.create(&header()).await.unwrap();
        repo.insert_detail(&detail(trd_id, 1, 1)).await.unwrap();
        repo.insert_detail(&detail(trd_id, 2, 1)).await.unwrap();

        repo.delete(trd_id).await.unwrap();

        assert!(repo.get_by_id(trd_id).await.unwrap().is_none());
        assert!(repo.list_details(trd_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.transactions().delete(424242).await.unwrap();
    }
}
