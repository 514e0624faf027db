//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, loans, scan, stats, MessageResponse};
use crate::error::ErrorResponse;
use crate::models::{
    borrower::Borrower,
    item::{Item, ItemKind, ItemStatus},
    loan::{LoanRecord, LoanStatus, StoredStatus},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Acadex Circulation API",
        version = "0.1.0",
        description = "Academy administration system - circulation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Loans
        loans::create_loan,
        loans::return_loan,
        loans::register_return,
        loans::list_loans,
        loans::list_overdue,
        // Scan
        scan::resolve_scan,
        // Statistics
        stats::get_loan_stats,
    ),
    components(
        schemas(
            health::HealthResponse,
            loans::CheckoutRequest,
            loans::ReturnRequest,
            loans::CheckoutResponse,
            loans::LoanView,
            loans::LoanListResponse,
            scan::ScanRequest,
            scan::ScanResponse,
            stats::LoanStats,
            stats::LoanStatsResponse,
            MessageResponse,
            ErrorResponse,
            Item,
            ItemKind,
            ItemStatus,
            Borrower,
            LoanRecord,
            LoanStatus,
            StoredStatus,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "loans", description = "Checkout and return of items"),
        (name = "scan", description = "Barcode/serial resolution"),
        (name = "stats", description = "Circulation counters")
    )
)]
pub struct ApiDoc;

/// Create the documentation router (Swagger UI + raw spec)
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
