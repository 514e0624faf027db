//! Loan ledger contract and in-memory implementation

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::loan::{LoanRecord, NewLoan, StoredStatus},
};

/// Persistence contract for loan records.
///
/// The ledger is append-only: records are created by `insert` and closed
/// by `mark_returned`; nothing ever deletes one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanLedger: Send + Sync {
    /// Insert a new Active loan. Fails with a conflict when the item
    /// already has an Active loan, so at most one exists per item.
    async fn insert(&self, loan: NewLoan) -> AppResult<LoanRecord>;

    /// Close an Active loan. The check and the transition happen
    /// atomically; a second caller on the same loan observes the
    /// already-returned state error. `returned_at` is clamped to the
    /// checkout instant when the clock reads earlier than it.
    async fn mark_returned(
        &self,
        loan_id: i32,
        returned_at: DateTime<Utc>,
    ) -> AppResult<LoanRecord>;

    async fn find_by_id(&self, id: i32) -> AppResult<LoanRecord>;

    async fn find_active_by_item(&self, item_id: i32) -> AppResult<Option<LoanRecord>>;

    /// Snapshot of all records in insertion order.
    async fn list_all(&self) -> AppResult<Vec<LoanRecord>>;
}

#[derive(Default)]
struct Ledger {
    seq: i32,
    loans: IndexMap<i32, LoanRecord>,
}

/// In-memory loan ledger
#[derive(Default)]
pub struct InMemoryLoanLedger {
    inner: RwLock<Ledger>,
}

impl InMemoryLoanLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanLedger for InMemoryLoanLedger {
    async fn insert(&self, loan: NewLoan) -> AppResult<LoanRecord> {
        let mut ledger = self.inner.write().map_err(|_| super::lock_poisoned())?;

        let already_active = ledger
            .loans
            .values()
            .any(|l| l.item_id == loan.item_id && l.stored_status == StoredStatus::Active);
        if already_active {
            return Err(AppError::Conflict(format!(
                "Item {} already has an active loan",
                loan.item_id
            )));
        }

        ledger.seq += 1;
        let record = LoanRecord {
            id: ledger.seq,
            item_id: loan.item_id,
            borrower_id: loan.borrower_id,
            checkout_at: loan.checkout_at,
            due_at: loan.due_at,
            returned_at: None,
            stored_status: StoredStatus::Active,
            custody_proof_ref: loan.custody_proof_ref,
            accessories_note: loan.accessories_note,
        };
        ledger.loans.insert(record.id, record.clone());
        Ok(record)
    }

    async fn mark_returned(
        &self,
        loan_id: i32,
        returned_at: DateTime<Utc>,
    ) -> AppResult<LoanRecord> {
        let mut ledger = self.inner.write().map_err(|_| super::lock_poisoned())?;

        let loan = ledger
            .loans
            .get_mut(&loan_id)
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if loan.stored_status == StoredStatus::Returned {
            return Err(AppError::State("Loan already returned".to_string()));
        }

        loan.returned_at = Some(returned_at.max(loan.checkout_at));
        loan.stored_status = StoredStatus::Returned;
        Ok(loan.clone())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<LoanRecord> {
        let ledger = self.inner.read().map_err(|_| super::lock_poisoned())?;
        ledger
            .loans
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    async fn find_active_by_item(&self, item_id: i32) -> AppResult<Option<LoanRecord>> {
        let ledger = self.inner.read().map_err(|_| super::lock_poisoned())?;
        Ok(ledger
            .loans
            .values()
            .find(|l| l.item_id == item_id && l.stored_status == StoredStatus::Active)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<LoanRecord>> {
        let ledger = self.inner.read().map_err(|_| super::lock_poisoned())?;
        Ok(ledger.loans.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_loan(item_id: i32) -> NewLoan {
        NewLoan {
            item_id,
            borrower_id: 1,
            checkout_at: Utc::now(),
            due_at: None,
            custody_proof_ref: "ref".to_string(),
            accessories_note: None,
        }
    }

    #[test]
    fn second_active_loan_for_same_item_conflicts() {
        let ledger = InMemoryLoanLedger::new();
        tokio_test::block_on(async {
            ledger.insert(new_loan(7)).await.unwrap();
            let err = ledger.insert(new_loan(7)).await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        });
    }

    #[test]
    fn item_can_be_loaned_again_after_return() {
        let ledger = InMemoryLoanLedger::new();
        tokio_test::block_on(async {
            let first = ledger.insert(new_loan(7)).await.unwrap();
            ledger.mark_returned(first.id, Utc::now()).await.unwrap();
            let second = ledger.insert(new_loan(7)).await.unwrap();
            assert_ne!(first.id, second.id);
            // Both records survive: the ledger never deletes.
            assert_eq!(ledger.list_all().await.unwrap().len(), 2);
        });
    }

    #[test]
    fn returned_at_is_clamped_to_checkout_instant() {
        let ledger = InMemoryLoanLedger::new();
        tokio_test::block_on(async {
            let checkout_at = Utc::now();
            let loan = ledger
                .insert(NewLoan {
                    checkout_at,
                    ..new_loan(3)
                })
                .await
                .unwrap();
            let returned = ledger
                .mark_returned(loan.id, checkout_at - Duration::hours(1))
                .await
                .unwrap();
            assert_eq!(returned.returned_at, Some(checkout_at));
        });
    }
}
