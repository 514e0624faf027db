//! Item registry contract and in-memory implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::item::{Item, ItemStatus},
};

/// Read access to borrowable items plus the single conditional write the
/// circulation engine is allowed to perform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRegistry: Send + Sync {
    /// Exact, case-sensitive lookup by serial number or barcode.
    async fn get_by_identifier(&self, identifier: &str) -> AppResult<Option<Item>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Item>>;

    /// Compare-and-swap on the item status. Returns `false` when the item
    /// is missing or its current status differs from `expected`; the swap
    /// and the comparison happen under one lock so concurrent callers are
    /// serialized per item.
    async fn set_status_atomic(
        &self,
        id: i32,
        expected: ItemStatus,
        new: ItemStatus,
    ) -> AppResult<bool>;
}

/// In-memory item registry
#[derive(Default)]
pub struct InMemoryItemRegistry {
    items: RwLock<HashMap<i32, Item>>,
}

impl InMemoryItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item. Inventory management owns item rows;
    /// this entry point exists for seeding and tests.
    pub fn insert(&self, item: Item) {
        if let Ok(mut items) = self.items.write() {
            items.insert(item.id, item);
        }
    }

    pub fn load(&self, batch: Vec<Item>) {
        for item in batch {
            self.insert(item);
        }
    }
}

#[async_trait]
impl ItemRegistry for InMemoryItemRegistry {
    async fn get_by_identifier(&self, identifier: &str) -> AppResult<Option<Item>> {
        let items = self.items.read().map_err(|_| super::lock_poisoned())?;
        Ok(items
            .values()
            .find(|item| item.identifier == identifier)
            .cloned())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Item>> {
        let items = self.items.read().map_err(|_| super::lock_poisoned())?;
        Ok(items.get(&id).cloned())
    }

    async fn set_status_atomic(
        &self,
        id: i32,
        expected: ItemStatus,
        new: ItemStatus,
    ) -> AppResult<bool> {
        let mut items = self.items.write().map_err(|_| super::lock_poisoned())?;
        match items.get_mut(&id) {
            Some(item) if item.status == expected => {
                item.status = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::ItemKind;

    fn item(id: i32, status: ItemStatus) -> Item {
        Item {
            id,
            kind: ItemKind::Device,
            identifier: format!("SN-{:04}", id),
            name: None,
            status,
            loanable: true,
        }
    }

    #[test]
    fn cas_swaps_only_from_expected_status() {
        let registry = InMemoryItemRegistry::new();
        registry.insert(item(1, ItemStatus::Available));

        tokio_test::block_on(async {
            assert!(registry
                .set_status_atomic(1, ItemStatus::Available, ItemStatus::Loaned)
                .await
                .unwrap());
            // Second swap from Available must miss.
            assert!(!registry
                .set_status_atomic(1, ItemStatus::Available, ItemStatus::Loaned)
                .await
                .unwrap());
            let current = registry.get_by_id(1).await.unwrap().unwrap();
            assert_eq!(current.status, ItemStatus::Loaned);
        });
    }

    #[test]
    fn cas_on_missing_item_is_false() {
        let registry = InMemoryItemRegistry::new();
        tokio_test::block_on(async {
            assert!(!registry
                .set_status_atomic(99, ItemStatus::Available, ItemStatus::Loaned)
                .await
                .unwrap());
        });
    }
}
