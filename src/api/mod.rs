//! API handlers for the circulation REST endpoints

pub mod health;
pub mod loans;
pub mod openapi;
pub mod scan;
pub mod stats;

use serde::Serialize;
use utoipa::ToSchema;

/// Envelope for endpoints that report an outcome without a payload
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    /// Human-readable outcome, suitable for re-display in the client form
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
