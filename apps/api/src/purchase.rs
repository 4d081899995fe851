//! Purchase workflow.
//!
//! Orchestrates one purchase as a staged unit of work:
//!
//! ```text
//! Initiated          create_transaction()        amounts = 0
//!     │
//!     ▼
//! DetailsRecorded    create_detail() × unit      one row per purchased unit
//!     │
//!     ▼
//! Finalized          update_transaction_amounts()  totals written once
//!
//! (any failure after Initiated → compensating delete of details + header;
//!  if the compensation itself fails, the orphaned trd_id is reported as a
//!  distinct error state, never hidden)
//! ```
//!
//! Totals are computed by the pure calculator over the original cart, not
//! over the expanded detail rows. The calculator also validates the cart,
//! and it runs before the header insert, so an invalid cart writes nothing.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use vend_core::{
    compute_totals, CartItem, CoreError, NewDetail, NewTransaction, DETAIL_TAX_CD, UNKNOWN_EMP_CD,
};
use vend_db::{Database, DbError, DbResult};

// =============================================================================
// Data Access Interface
// =============================================================================

/// Persistence boundary consumed by the purchase workflow.
///
/// `vend_db::Database` is the production implementation; tests drive the
/// workflow's failure paths with an in-memory mock.
#[async_trait]
pub trait PurchaseStore: Send + Sync {
    /// Inserts a header with zero amounts; returns the generated trd_id.
    async fn create_transaction(&self, header: &NewTransaction) -> DbResult<i64>;

    /// Inserts one per-unit detail row.
    async fn create_detail(&self, row: &NewDetail) -> DbResult<()>;

    /// Writes final amounts onto the header.
    async fn update_transaction_amounts(
        &self,
        trd_id: i64,
        total_amt: i64,
        ttl_amt_ex_tax: i64,
    ) -> DbResult<()>;

    /// Removes the header and any detail rows (compensation).
    async fn delete_transaction(&self, trd_id: i64) -> DbResult<()>;
}

#[async_trait]
impl PurchaseStore for Database {
    async fn create_transaction(&self, header: &NewTransaction) -> DbResult<i64> {
        self.transactions().create(header).await
    }

    async fn create_detail(&self, row: &NewDetail) -> DbResult<()> {
        self.transactions().insert_detail(row).await
    }

    async fn update_transaction_amounts(
        &self,
        trd_id: i64,
        total_amt: i64,
        ttl_amt_ex_tax: i64,
    ) -> DbResult<()> {
        self.transactions()
            .update_amounts(trd_id, total_amt, ttl_amt_ex_tax)
            .await
    }

    async fn delete_transaction(&self, trd_id: i64) -> DbResult<()> {
        self.transactions().delete(trd_id).await
    }
}

// =============================================================================
// Workflow
// =============================================================================

/// Result of a completed purchase.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseOutcome {
    pub trd_id: i64,
    pub total_amt: i64,
    pub ttl_amt_ex_tax: i64,
    pub tax_amt: i64,
}

/// Purchase workflow failures.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart failed validation; nothing was persisted.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// A persistence step failed; any partial rows were removed.
    #[error("purchase aborted: {0}")]
    Store(#[source] DbError),

    /// A persistence step failed AND the compensating delete failed too:
    /// transaction {trd_id} persists in a partial state.
    #[error("purchase aborted and cleanup failed for transaction {trd_id}: {cleanup} (original failure: {cause})")]
    CompensationFailed {
        trd_id: i64,
        #[source]
        cause: DbError,
        cleanup: DbError,
    },
}

/// Executes purchases against a [`PurchaseStore`].
pub struct PurchaseWorkflow {
    store: Arc<dyn PurchaseStore>,
    store_cd: String,
    pos_no: String,
}

impl PurchaseWorkflow {
    /// Creates a workflow stamping the given store/terminal codes onto
    /// every header.
    pub fn new(store: Arc<dyn PurchaseStore>, store_cd: String, pos_no: String) -> Self {
        PurchaseWorkflow {
            store,
            store_cd,
            pos_no,
        }
    }

    /// Records one purchase and returns its computed amounts.
    ///
    /// `emp_cd` defaults to the unknown-employee sentinel when absent.
    pub async fn execute(
        &self,
        items: &[CartItem],
        emp_cd: Option<&str>,
    ) -> Result<PurchaseOutcome, CheckoutError> {
        // Validates every item; an invalid cart aborts before any write.
        let totals = compute_totals(items)?;

        let header = NewTransaction {
            datetime: Utc::now(),
            emp_cd: emp_cd.unwrap_or(UNKNOWN_EMP_CD).to_string(),
            store_cd: self.store_cd.clone(),
            pos_no: self.pos_no.clone(),
        };

        let trd_id = self
            .store
            .create_transaction(&header)
            .await
            .map_err(CheckoutError::Store)?;
        debug!(trd_id, "transaction header created");

        for item in items {
            // One row per unit; the unit index restarts at 1 for each
            // cart item and is what lands in dtl_id.
            for unit in 1..=item.quantity {
                let row = NewDetail::for_unit(trd_id, unit, item, DETAIL_TAX_CD);
                if let Err(cause) = self.store.create_detail(&row).await {
                    return Err(self.compensate(trd_id, cause).await);
                }
            }
        }
        debug!(trd_id, "detail rows recorded");

        if let Err(cause) = self
            .store
            .update_transaction_amounts(trd_id, totals.total_amt, totals.subtotal_ex_tax)
            .await
        {
            return Err(self.compensate(trd_id, cause).await);
        }

        info!(
            trd_id,
            total_amt = totals.total_amt,
            tax_amt = totals.tax_amt,
            "purchase recorded"
        );

        Ok(PurchaseOutcome {
            trd_id,
            total_amt: totals.total_amt,
            ttl_amt_ex_tax: totals.subtotal_ex_tax,
            tax_amt: totals.tax_amt,
        })
    }

    /// Best-effort removal of partial rows after a failed step.
    async fn compensate(&self, trd_id: i64, cause: DbError) -> CheckoutError {
        warn!(trd_id, error = %cause, "purchase step failed, removing partial rows");

        match self.store.delete_transaction(trd_id).await {
            Ok(()) => CheckoutError::Store(cause),
            Err(cleanup) => {
                error!(
                    trd_id,
                    error = %cleanup,
                    "compensating delete failed, partial transaction persists"
                );
                CheckoutError::CompensationFailed {
                    trd_id,
                    cause,
                    cleanup,
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests (mock store)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory store with injectable failures.
    #[derive(Default)]
    struct MockStore {
        state: Mutex<MockState>,
    }

    #[derive(Default)]
    struct MockState {
        next_trd_id: i64,
        headers: Vec<(i64, NewTransaction)>,
        details: Vec<NewDetail>,
        amounts: Vec<(i64, i64, i64)>,
        deleted: Vec<i64>,
        fail_header: bool,
        /// Fail the Nth detail insert (1-based).
        fail_detail_at: Option<usize>,
        fail_update: bool,
        fail_delete: bool,
    }

    impl MockStore {
        fn with<F: FnOnce(&mut MockState)>(f: F) -> Arc<Self> {
            let store = MockStore::default();
            f(&mut store.state.lock().unwrap());
            Arc::new(store)
        }

        fn failure() -> DbError {
            DbError::QueryFailed("injected".to_string())
        }
    }

    #[async_trait]
    impl PurchaseStore for MockStore {
        async fn create_transaction(&self, header: &NewTransaction) -> DbResult<i64> {
            let mut state = self.state.lock().unwrap();
            if state.fail_header {
                return Err(Self::failure());
            }
            state.next_trd_id += 1;
            let id = state.next_trd_id;
            state.headers.push((id, header.clone()));
            Ok(id)
        }

        async fn create_detail(&self, row: &NewDetail) -> DbResult<()> {
            let mut state = self.state.lock().unwrap();
            if state.fail_detail_at == Some(state.details.len() + 1) {
                return Err(Self::failure());
            }
            state.details.push(row.clone());
            Ok(())
        }

        async fn update_transaction_amounts(
            &self,
            trd_id: i64,
            total_amt: i64,
            ttl_amt_ex_tax: i64,
        ) -> DbResult<()> {
            let mut state = self.state.lock().unwrap();
            if state.fail_update {
                return Err(Self::failure());
            }
            state.amounts.push((trd_id, total_amt, ttl_amt_ex_tax));
            Ok(())
        }

        async fn delete_transaction(&self, trd_id: i64) -> DbResult<()> {
            let mut state = self.state.lock().unwrap();
            if state.fail_delete {
                return Err(Self::failure());
            }
            state.details.retain(|d| d.trd_id != trd_id);
            state.headers.retain(|(id, _)| *id != trd_id);
            state.deleted.push(trd_id);
            Ok(())
        }
    }

    fn workflow(store: Arc<MockStore>) -> PurchaseWorkflow {
        PurchaseWorkflow::new(store, "30".to_string(), "90".to_string())
    }

    fn item(prd_id: i64, price: i64, quantity: i64) -> CartItem {
        CartItem {
            prd_id,
            code: 1000 + prd_id,
            name: format!("product-{prd_id}"),
            price,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_happy_path_expands_units_and_finalizes() {
        let store = MockStore::with(|_| {});
        let outcome = workflow(store.clone())
            .execute(&[item(1, 1000, 2), item(2, 500, 1)], None)
            .await
            .unwrap();

        assert_eq!(outcome.total_amt, 2750);
        assert_eq!(outcome.ttl_amt_ex_tax, 2500);
        assert_eq!(outcome.tax_amt, 250);

        let state = store.state.lock().unwrap();
        // 3 units -> 3 rows; dtl_id restarts per cart item.
        assert_eq!(
            state.details.iter().map(|d| d.dtl_id).collect::<Vec<_>>(),
            vec![1, 2, 1]
        );
        assert!(state.details.iter().all(|d| d.tax_cd == "10"));
        // Amounts written exactly once.
        assert_eq!(state.amounts, vec![(outcome.trd_id, 2750, 2500)]);
    }

    #[tokio::test]
    async fn test_emp_cd_defaults_to_sentinel() {
        let store = MockStore::with(|_| {});
        let wf = workflow(store.clone());
        wf.execute(&[item(1, 100, 1)], None).await.unwrap();
        wf.execute(&[item(1, 100, 1)], Some("EMP001")).await.unwrap();

        let state = store.state.lock().unwrap();
        assert_eq!(state.headers[0].1.emp_cd, "9999999999");
        assert_eq!(state.headers[1].1.emp_cd, "EMP001");
        assert_eq!(state.headers[0].1.store_cd, "30");
        assert_eq!(state.headers[0].1.pos_no, "90");
    }

    #[tokio::test]
    async fn test_invalid_cart_writes_nothing() {
        let store = MockStore::with(|_| {});
        let err = workflow(store.clone())
            .execute(&[item(1, 100, 0)], None)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Invalid(_)));
        let state = store.state.lock().unwrap();
        assert!(state.headers.is_empty());
        assert!(state.details.is_empty());
    }

    #[tokio::test]
    async fn test_header_failure_leaves_no_partial_state() {
        let store = MockStore::with(|s| s.fail_header = true);
        let err = workflow(store.clone())
            .execute(&[item(1, 100, 1)], None)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Store(_)));
        let state = store.state.lock().unwrap();
        assert!(state.details.is_empty());
        // Nothing existed, so nothing was compensated either.
        assert!(state.deleted.is_empty());
    }

    #[tokio::test]
    async fn test_detail_failure_compensates() {
        // Fail the third unit insert (second unit of the first item is ok).
        let store = MockStore::with(|s| s.fail_detail_at = Some(3));
        let err = workflow(store.clone())
            .execute(&[item(1, 1000, 2), item(2, 500, 1)], None)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Store(_)));
        let state = store.state.lock().unwrap();
        assert_eq!(state.deleted, vec![1]);
        assert!(state.headers.is_empty());
        assert!(state.details.is_empty());
        assert!(state.amounts.is_empty());
    }

    #[tokio::test]
    async fn test_update_failure_compensates() {
        let store = MockStore::with(|s| s.fail_update = true);
        let err = workflow(store.clone())
            .execute(&[item(1, 1000, 2)], Some("EMP001"))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::Store(_)));
        let state = store.state.lock().unwrap();
        assert_eq!(state.deleted, vec![1]);
        assert!(state.details.is_empty());
    }

    #[tokio::test]
    async fn test_compensation_failure_reports_orphan() {
        let store = MockStore::with(|s| {
            s.fail_update = true;
            s.fail_delete = true;
        });
        let err = workflow(store.clone())
            .execute(&[item(1, 1000, 1)], None)
            .await
            .unwrap_err();

        match err {
            CheckoutError::CompensationFailed { trd_id, .. } => assert_eq!(trd_id, 1),
            other => panic!("expected CompensationFailed, got {other:?}"),
        }
        // The partial rows really are still there.
        let state = store.state.lock().unwrap();
        assert_eq!(state.headers.len(), 1);
        assert_eq!(state.headers[0].0, 1);
        assert_eq!(state.details.len(), 1);
    }
}
