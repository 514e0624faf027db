//! Borrower directory contract and in-memory implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{error::AppResult, models::borrower::Borrower};

/// Read-only access to borrower records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowerDirectory: Send + Sync {
    async fn get(&self, id: i32) -> AppResult<Option<Borrower>>;
}

/// In-memory borrower directory
#[derive(Default)]
pub struct InMemoryBorrowerDirectory {
    borrowers: RwLock<HashMap<i32, Borrower>>,
}

impl InMemoryBorrowerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, borrower: Borrower) {
        if let Ok(mut borrowers) = self.borrowers.write() {
            borrowers.insert(borrower.id, borrower);
        }
    }

    pub fn load(&self, batch: Vec<Borrower>) {
        for borrower in batch {
            self.insert(borrower);
        }
    }
}

#[async_trait]
impl BorrowerDirectory for InMemoryBorrowerDirectory {
    async fn get(&self, id: i32) -> AppResult<Option<Borrower>> {
        let borrowers = self.borrowers.read().map_err(|_| super::lock_poisoned())?;
        Ok(borrowers.get(&id).cloned())
    }
}
