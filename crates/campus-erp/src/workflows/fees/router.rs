use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{FeeCharge, ReceiptId};
use super::service::{FeeService, FeeServiceError};
use crate::workflows::storage::RepositoryError;

/// Router builder exposing the fee charge and payment endpoints.
pub fn fee_router(service: Arc<FeeService>) -> Router {
    Router::new()
        .route("/api/v1/fees", post(record_handler))
        .route("/api/v1/fees/:receipt", get(get_handler))
        .route("/api/v1/fees/:receipt/payments", post(payment_handler))
        .with_state(service)
}

pub(crate) async fn record_handler(
    State(service): State<Arc<FeeService>>,
    axum::Json(charge): axum::Json<FeeCharge>,
) -> Response {
    match service.record(charge) {
        Ok(payment) => (StatusCode::CREATED, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler(
    State(service): State<Arc<FeeService>>,
    Path(receipt): Path<String>,
) -> Response {
    match service.get(&ReceiptId(receipt)) {
        Ok(payment) => (StatusCode::OK, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentRequest {
    amount: u32,
}

pub(crate) async fn payment_handler(
    State(service): State<Arc<FeeService>>,
    Path(receipt): Path<String>,
    axum::Json(request): axum::Json<PaymentRequest>,
) -> Response {
    match service.register_payment(&ReceiptId(receipt), request.amount) {
        Ok(payment) => (StatusCode::OK, axum::Json(payment)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: FeeServiceError) -> Response {
    let status = match &error {
        FeeServiceError::Overpayment { .. } => StatusCode::BAD_REQUEST,
        FeeServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        FeeServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        FeeServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
