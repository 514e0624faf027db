//! Borrower model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Borrower record as held by the borrower directory; read-only to the
/// circulation engine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Borrower {
    pub id: i32,
    pub name: String,
    /// Inactive borrowers cannot receive loans.
    pub active: bool,
}
