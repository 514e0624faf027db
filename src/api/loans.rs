//! Loan circulation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::ItemRef,
        loan::{LoanRecord, LoanStatus},
    },
    services::circulation::CheckoutCommand,
};

use super::MessageResponse;

/// Checkout request. The legacy client field names are accepted as
/// aliases alongside the canonical ones.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Borrower (student) ID
    #[serde(alias = "aluno_id")]
    pub borrower_id: i32,
    /// Item ID, when the caller already knows it
    #[serde(default, alias = "device_id")]
    pub item_id: Option<i32>,
    /// Scanned or typed item code (serial number / barcode)
    #[serde(default, alias = "codigo_barras", alias = "item_ref")]
    pub code: Option<String>,
    /// Checkout date; today when omitted
    #[serde(default, alias = "data_retirada")]
    pub checkout_date: Option<NaiveDate>,
    /// Expected return date; derived from configuration when omitted
    #[serde(default, alias = "data_devolucao")]
    pub due_date: Option<NaiveDate>,
    /// Signature image, as a base64 data-URL drawn in the client
    #[serde(alias = "assinatura")]
    pub signature: String,
    /// Accessories handed over with the item
    #[serde(default, alias = "observacao", alias = "acessorios")]
    pub accessories: Option<String>,
}

/// Return request: by loan id, or by a scanned item code
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnRequest {
    #[serde(default, alias = "emprestimo_id")]
    pub loan_id: Option<i32>,
    #[serde(default, alias = "codigo_barras")]
    pub code: Option<String>,
}

/// Checkout response carrying the created loan
#[derive(Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub data: LoanRecord,
}

/// Loan record together with its status derived at response time
#[derive(Serialize, ToSchema)]
pub struct LoanView {
    #[serde(flatten)]
    pub record: LoanRecord,
    pub status: LoanStatus,
}

/// Loan listing response
#[derive(Serialize, ToSchema)]
pub struct LoanListResponse {
    pub success: bool,
    pub data: Vec<LoanView>,
}

/// Query parameters for the overdue listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct OverdueQuery {
    /// Reference instant for the overdue classification; now when omitted
    pub as_of: Option<DateTime<Utc>>,
}

/// Check an item out to a borrower
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Loan registered", body = CheckoutResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item not available for loan")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let item = match (request.item_id, request.code.as_deref()) {
        (Some(id), _) => ItemRef::Id(id),
        (None, Some(code)) if !code.trim().is_empty() => ItemRef::Code(code.to_string()),
        _ => {
            return Err(AppError::Validation(
                "An item id or code is required".to_string(),
            ))
        }
    };

    let checkout_at = start_of_day(
        request
            .checkout_date
            .unwrap_or_else(|| Utc::now().date_naive()),
    );
    let due_at = request.due_date.map(start_of_day).or_else(|| {
        state
            .config
            .circulation
            .default_loan_days
            .map(|days| checkout_at + Duration::days(i64::from(days)))
    });
    let proof = decode_signature(&request.signature)?;

    let loan = state
        .services
        .circulation
        .checkout(CheckoutCommand {
            borrower_id: request.borrower_id,
            item,
            checkout_at,
            due_at,
            proof,
            accessories_note: request.accessories,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            success: true,
            message: "Loan registered successfully".to_string(),
            data: loan,
        }),
    ))
}

/// Return a loaned item by loan id
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Return registered", body = MessageResponse),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.circulation.return_item(loan_id).await?;
    Ok(Json(MessageResponse::new("Return registered successfully")))
}

/// Return a loaned item by loan id or scanned code
#[utoipa::path(
    post,
    path = "/returns",
    tag = "loans",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Return registered", body = MessageResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "No matching active loan"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn register_return(
    State(state): State<crate::AppState>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<MessageResponse>> {
    match (request.loan_id, request.code.as_deref()) {
        (Some(loan_id), _) => {
            state.services.circulation.return_item(loan_id).await?;
        }
        (None, Some(code)) if !code.trim().is_empty() => {
            state.services.circulation.return_by_code(code).await?;
        }
        _ => {
            return Err(AppError::Validation(
                "A loan id or item code is required".to_string(),
            ))
        }
    }
    Ok(Json(MessageResponse::new("Return registered successfully")))
}

/// List all loans, newest first, with derived status
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    responses(
        (status = 200, description = "All loans", body = LoanListResponse)
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
) -> AppResult<Json<LoanListResponse>> {
    let now = Utc::now();
    let mut loans = state.services.circulation.list_loans().await?;
    loans.reverse();
    let data = loans
        .into_iter()
        .map(|record| LoanView {
            status: record.status_as_of(now),
            record,
        })
        .collect();
    Ok(Json(LoanListResponse {
        success: true,
        data,
    }))
}

/// List loans that are overdue as of the given instant
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    params(OverdueQuery),
    responses(
        (status = 200, description = "Overdue loans", body = LoanListResponse)
    )
)]
pub async fn list_overdue(
    State(state): State<crate::AppState>,
    Query(query): Query<OverdueQuery>,
) -> AppResult<Json<LoanListResponse>> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let data = state
        .services
        .circulation
        .list_overdue(as_of)
        .await?
        .into_iter()
        .map(|record| LoanView {
            status: record.status_as_of(as_of),
            record,
        })
        .collect();
    Ok(Json(LoanListResponse {
        success: true,
        data,
    }))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Decode the signature payload: a `data:*;base64,…` URL as produced by
/// the client's signature pad, or raw bytes otherwise.
fn decode_signature(signature: &str) -> AppResult<Vec<u8>> {
    let trimmed = signature.trim();
    if trimmed.starts_with("data:") {
        let encoded = trimmed
            .split_once(";base64,")
            .map(|(_, encoded)| encoded)
            .ok_or_else(|| {
                AppError::Validation("Signature data-URL must be base64-encoded".to_string())
            })?;
        BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| AppError::Validation("Signature data-URL is not valid base64".to_string()))
    } else {
        Ok(trimmed.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_data_url_signature() {
        let bytes = decode_signature("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn raw_signature_passes_through_as_bytes() {
        let bytes = decode_signature("John Doe").unwrap();
        assert_eq!(bytes, b"John Doe");
    }

    #[test]
    fn empty_signature_decodes_to_empty_proof() {
        assert!(decode_signature("").unwrap().is_empty());
    }

    #[test]
    fn malformed_base64_is_rejected() {
        let err = decode_signature("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn data_url_without_base64_marker_is_rejected() {
        let err = decode_signature("data:image/png,plain").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
