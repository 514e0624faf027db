//! Scan resolution service

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
    repository::Repository,
};

/// Turns a raw scanned or typed code into an item.
///
/// Stateless and idempotent: the same code always resolves the same way,
/// with no side effects. Deduplication of rapid repeated deliveries is the
/// caller's job, before the engine is invoked.
#[derive(Clone)]
pub struct ScanService {
    repository: Repository,
}

impl ScanService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Resolve a code against item identifiers: whitespace-trimmed,
    /// case-sensitive exact match.
    pub async fn resolve(&self, raw_code: &str) -> AppResult<Item> {
        let code = raw_code.trim();
        self.repository
            .items
            .get_by_identifier(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No item matches code {:?}", code)))
    }
}
