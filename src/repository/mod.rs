//! Collaborator contracts and storage implementations.
//!
//! Each sub-module holds one consumed interface (item registry, borrower
//! directory, loan ledger, custody storage) together with its in-memory
//! reference implementation. The engine only ever sees the traits, so a
//! database-backed implementation can be swapped in without touching it.

pub mod borrowers;
pub mod custody;
pub mod items;
pub mod loans;

use std::sync::Arc;

use crate::error::AppError;

pub use borrowers::BorrowerDirectory;
pub use custody::CustodyStorage;
pub use items::ItemRegistry;
pub use loans::LoanLedger;

/// Main repository struct holding all collaborator handles
#[derive(Clone)]
pub struct Repository {
    pub items: Arc<dyn ItemRegistry>,
    pub borrowers: Arc<dyn BorrowerDirectory>,
    pub loans: Arc<dyn LoanLedger>,
    pub custody: Arc<dyn CustodyStorage>,
}

impl Repository {
    /// Create a repository from the given collaborator handles
    pub fn new(
        items: Arc<dyn ItemRegistry>,
        borrowers: Arc<dyn BorrowerDirectory>,
        loans: Arc<dyn LoanLedger>,
        custody: Arc<dyn CustodyStorage>,
    ) -> Self {
        Self {
            items,
            borrowers,
            loans,
            custody,
        }
    }

}

pub(crate) fn lock_poisoned() -> AppError {
    AppError::Internal("storage lock poisoned".to_string())
}
