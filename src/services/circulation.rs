//! Circulation engine: checkout, return, and derived loan status

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{Item, ItemRef, ItemStatus},
        loan::{LoanRecord, LoanStatus, NewLoan},
    },
    repository::Repository,
};

/// Everything a caller supplies to check an item out
#[derive(Debug, Clone)]
pub struct CheckoutCommand {
    pub borrower_id: i32,
    pub item: ItemRef,
    pub checkout_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    /// Captured signature image, already decoded to raw bytes.
    pub proof: Vec<u8>,
    pub accessories_note: Option<String>,
}

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check an item out to a borrower.
    ///
    /// Preconditions are evaluated in a fixed order and the first failure
    /// wins. The effect is a single critical section per item: the status
    /// compare-and-swap admits exactly one concurrent caller, and a ledger
    /// failure after the swap rolls the item back before the error
    /// propagates. The stored custody proof precedes the critical section
    /// and is not rolled back.
    pub async fn checkout(&self, cmd: CheckoutCommand) -> AppResult<LoanRecord> {
        let item = self
            .resolve_ref(&cmd.item)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", cmd.item)))?;

        if !item.loanable || item.status != ItemStatus::Available {
            return Err(item_unavailable(&item));
        }

        match self.repository.borrowers.get(cmd.borrower_id).await? {
            Some(borrower) if borrower.active => {}
            _ => {
                return Err(AppError::Validation(format!(
                    "Borrower {} not found or inactive",
                    cmd.borrower_id
                )))
            }
        }

        if cmd.proof.is_empty() {
            return Err(AppError::Validation(
                "Custody proof is required".to_string(),
            ));
        }

        if let Some(due_at) = cmd.due_at {
            if due_at < cmd.checkout_at {
                return Err(AppError::Validation(
                    "Due date cannot precede the checkout date".to_string(),
                ));
            }
        }

        let custody_proof_ref = self.repository.custody.store(&cmd.proof).await?;

        let swapped = self
            .repository
            .items
            .set_status_atomic(item.id, ItemStatus::Available, ItemStatus::Loaned)
            .await?;
        if !swapped {
            // Lost the race: someone else checked the item out between the
            // precondition read and the swap.
            return Err(item_unavailable(&item));
        }

        let new_loan = NewLoan {
            item_id: item.id,
            borrower_id: cmd.borrower_id,
            checkout_at: cmd.checkout_at,
            due_at: cmd.due_at,
            custody_proof_ref,
            accessories_note: cmd.accessories_note,
        };

        match self.repository.loans.insert(new_loan).await {
            Ok(record) => {
                tracing::info!(
                    loan_id = record.id,
                    item_id = item.id,
                    borrower_id = cmd.borrower_id,
                    "item checked out"
                );
                Ok(record)
            }
            Err(err) => {
                let rolled_back = self
                    .repository
                    .items
                    .set_status_atomic(item.id, ItemStatus::Loaned, ItemStatus::Available)
                    .await
                    .unwrap_or(false);
                if !rolled_back {
                    tracing::error!(
                        item_id = item.id,
                        "could not roll back item status after ledger error"
                    );
                }
                Err(err)
            }
        }
    }

    /// Close a loan and release its item.
    ///
    /// The item goes back to `Available` unless inventory management has
    /// since flipped it to `Maintenance` or `Lost`; then only the loan is
    /// closed and the item is left untouched.
    pub async fn return_item(&self, loan_id: i32) -> AppResult<LoanRecord> {
        let loan = self
            .repository
            .loans
            .mark_returned(loan_id, Utc::now())
            .await?;

        let released = self
            .repository
            .items
            .set_status_atomic(loan.item_id, ItemStatus::Loaned, ItemStatus::Available)
            .await?;
        if !released {
            tracing::debug!(
                item_id = loan.item_id,
                "item not released on return, status externally managed"
            );
        }

        tracing::info!(loan_id = loan.id, item_id = loan.item_id, "loan returned");
        Ok(loan)
    }

    /// Close the active loan for a scanned item code.
    pub async fn return_by_code(&self, raw_code: &str) -> AppResult<LoanRecord> {
        let code = raw_code.trim();
        let item = self
            .repository
            .items
            .get_by_identifier(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No item matches code {:?}", code)))?;

        let loan = self
            .repository
            .loans
            .find_active_by_item(item.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No active loan for item {}", item.identifier))
            })?;

        self.return_item(loan.id).await
    }

    /// Classify a loan as of the given instant; never persisted.
    pub fn compute_status(loan: &LoanRecord, as_of: DateTime<Utc>) -> LoanStatus {
        loan.status_as_of(as_of)
    }

    /// All loan records, in ledger (insertion) order.
    pub async fn list_loans(&self) -> AppResult<Vec<LoanRecord>> {
        self.repository.loans.list_all().await
    }

    /// Loans overdue as of the given instant, re-evaluated on every call.
    pub async fn list_overdue(&self, as_of: DateTime<Utc>) -> AppResult<Vec<LoanRecord>> {
        let loans = self.repository.loans.list_all().await?;
        Ok(loans
            .into_iter()
            .filter(|loan| loan.status_as_of(as_of) == LoanStatus::Overdue)
            .collect())
    }

    /// Count loans that are still open
    pub async fn count_active(&self) -> AppResult<usize> {
        let loans = self.repository.loans.list_all().await?;
        Ok(loans
            .iter()
            .filter(|loan| loan.returned_at.is_none())
            .count())
    }

    /// Count loans overdue as of now
    pub async fn count_overdue(&self) -> AppResult<usize> {
        Ok(self.list_overdue(Utc::now()).await?.len())
    }

    async fn resolve_ref(&self, item: &ItemRef) -> AppResult<Option<Item>> {
        match item {
            ItemRef::Id(id) => self.repository.items.get_by_id(*id).await,
            ItemRef::Code(code) => self.repository.items.get_by_identifier(code.trim()).await,
        }
    }
}

fn item_unavailable(item: &Item) -> AppError {
    AppError::Conflict(format!(
        "Item {} is not available for loan",
        item.identifier
    ))
}
