//! Custody proof storage contract and in-memory implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;

/// Write-side of custody proof capture: persists a signature image and
/// hands back an opaque reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustodyStorage: Send + Sync {
    async fn store(&self, bytes: &[u8]) -> AppResult<String>;
}

/// In-memory custody storage with UUID references
#[derive(Default)]
pub struct InMemoryCustodyStorage {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryCustodyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored proof; used by tests to assert captures.
    pub fn get(&self, proof_ref: &str) -> Option<Vec<u8>> {
        self.blobs.read().ok()?.get(proof_ref).cloned()
    }
}

#[async_trait]
impl CustodyStorage for InMemoryCustodyStorage {
    async fn store(&self, bytes: &[u8]) -> AppResult<String> {
        let proof_ref = Uuid::new_v4().to_string();
        let mut blobs = self.blobs.write().map_err(|_| super::lock_poisoned())?;
        blobs.insert(proof_ref.clone(), bytes.to_vec());
        Ok(proof_ref)
    }
}
