//! Data models for the circulation server

pub mod borrower;
pub mod item;
pub mod loan;

// Re-export commonly used types
pub use borrower::Borrower;
pub use item::{Item, ItemKind, ItemRef, ItemStatus};
pub use loan::{LoanRecord, LoanStatus, NewLoan, StoredStatus};
