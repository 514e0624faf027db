//! Scan resolution endpoint and boundary-side duplicate suppression

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::item::Item,
};

/// Suppresses rapid duplicate deliveries of the same scanned code.
///
/// Camera-driven scanners emit the same code many times per second; each
/// code is resolved once per window. Presentation-layer state only: the
/// resolver and the engine never see the suppressed deliveries.
pub struct ScanGate {
    window: Duration,
    seen: HashMap<String, Instant>,
}

impl ScanGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    /// Returns `true` when the code should be processed, `false` when it
    /// is a duplicate delivery inside the window.
    pub fn admit(&mut self, code: &str) -> bool {
        self.admit_at(code, Instant::now())
    }

    fn admit_at(&mut self, code: &str, at: Instant) -> bool {
        let window = self.window;
        self.seen
            .retain(|_, last| at.duration_since(*last) < window);
        if self.seen.contains_key(code) {
            return false;
        }
        self.seen.insert(code.to_string(), at);
        true
    }
}

/// Scan resolution request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Decoded barcode/QR payload or manually typed identifier
    #[serde(alias = "codigo_barras", alias = "codigo")]
    pub code: String,
}

/// Scan resolution response; `data` is absent for suppressed duplicates
#[derive(Serialize, ToSchema)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Item>,
}

/// Resolve a scanned code to an item
#[utoipa::path(
    post,
    path = "/scan",
    tag = "scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Resolved item, or duplicate acknowledgement", body = ScanResponse),
        (status = 404, description = "No item matches the code")
    )
)]
pub async fn resolve_scan(
    State(state): State<crate::AppState>,
    Json(request): Json<ScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    let code = request.code.trim().to_string();

    let admitted = {
        let mut gate = state
            .scan_gate
            .lock()
            .map_err(|_| AppError::Internal("scan gate lock poisoned".to_string()))?;
        gate.admit(&code)
    };
    if !admitted {
        return Ok(Json(ScanResponse {
            success: true,
            message: Some("Duplicate scan ignored".to_string()),
            data: None,
        }));
    }

    let item = state.services.scan.resolve(&code).await?;
    Ok(Json(ScanResponse {
        success: true,
        message: None,
        data: Some(item),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_within_window_is_suppressed() {
        let mut gate = ScanGate::new(Duration::from_millis(1500));
        let t0 = Instant::now();
        assert!(gate.admit_at("X123", t0));
        assert!(!gate.admit_at("X123", t0 + Duration::from_millis(200)));
    }

    #[test]
    fn same_code_is_admitted_again_after_window() {
        let mut gate = ScanGate::new(Duration::from_millis(1500));
        let t0 = Instant::now();
        assert!(gate.admit_at("X123", t0));
        assert!(gate.admit_at("X123", t0 + Duration::from_millis(1600)));
    }

    #[test]
    fn distinct_codes_do_not_interfere() {
        let mut gate = ScanGate::new(Duration::from_millis(1500));
        let t0 = Instant::now();
        assert!(gate.admit_at("X123", t0));
        assert!(gate.admit_at("Y456", t0 + Duration::from_millis(10)));
    }
}
