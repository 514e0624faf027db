//! Borrowable item model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Device,
    BookExemplar,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemKind::Device => "Device",
            ItemKind::BookExemplar => "Book exemplar",
        };
        write!(f, "{}", label)
    }
}

/// Item operational status.
///
/// `Available` and `Loaned` are driven by the circulation engine;
/// `Maintenance` and `Lost` are set by inventory management and block
/// checkout without the engine ever entering or leaving them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    Loaned,
    Maintenance,
    Lost,
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Available
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemStatus::Available => "Available",
            ItemStatus::Loaned => "Loaned",
            ItemStatus::Maintenance => "Maintenance",
            ItemStatus::Lost => "Lost",
        };
        write!(f, "{}", label)
    }
}

/// Borrowable item as held by the item registry.
///
/// The engine reads items and flips `status`; creation and destruction
/// belong to the inventory management feature.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i32,
    pub kind: ItemKind,
    /// Serial number or barcode; unique across the registry.
    pub identifier: String,
    /// Display name from the inventory.
    pub name: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    pub loanable: bool,
}

/// Reference to an item as supplied by a caller: either a registry id
/// or a raw scanned/typed code still to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Id(i32),
    Code(String),
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRef::Id(id) => write!(f, "#{}", id),
            ItemRef::Code(code) => write!(f, "{:?}", code),
        }
    }
}
