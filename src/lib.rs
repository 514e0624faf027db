//! Acadex Circulation Server
//!
//! The loan/circulation engine of the Acadex academy administration system:
//! a REST JSON API for checking items (devices, book exemplars) out to
//! borrowers, capturing custody proof, tracking due dates, and processing
//! returns.

use std::sync::{Arc, Mutex};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Boundary-only scan deduplication; never visible to the engine.
    pub scan_gate: Arc<Mutex<api::scan::ScanGate>>,
}
