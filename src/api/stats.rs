//! Circulation statistics endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Loan counters for the dashboard
#[derive(Serialize, ToSchema)]
pub struct LoanStats {
    pub active: usize,
    pub overdue: usize,
}

/// Loan statistics response
#[derive(Serialize, ToSchema)]
pub struct LoanStatsResponse {
    pub success: bool,
    pub data: LoanStats,
}

/// Get active and overdue loan counts
#[utoipa::path(
    get,
    path = "/stats/loans",
    tag = "stats",
    responses(
        (status = 200, description = "Loan counters", body = LoanStatsResponse)
    )
)]
pub async fn get_loan_stats(
    State(state): State<crate::AppState>,
) -> AppResult<Json<LoanStatsResponse>> {
    let active = state.services.circulation.count_active().await?;
    let overdue = state.services.circulation.count_overdue().await?;
    Ok(Json(LoanStatsResponse {
        success: true,
        data: LoanStats { active, overdue },
    }))
}
