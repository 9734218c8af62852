use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AdmissionDecision, AdmissionId, AdmissionSubmission, AdmissionUpdate};
use super::repository::AdmissionFilter;
use super::service::{AdmissionService, AdmissionServiceError};
use crate::workflows::storage::RepositoryError;

/// Router builder exposing the admission intake and decision endpoints.
pub fn admission_router(service: Arc<AdmissionService>) -> Router {
    Router::new()
        .route(
            "/api/v1/admissions",
            post(submit_handler).get(list_handler),
        )
        .route("/api/v1/admissions/stats", get(stats_handler))
        .route(
            "/api/v1/admissions/:admission_id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route(
            "/api/v1/admissions/:admission_id/decision",
            put(decide_handler),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<AdmissionService>>,
    axum::Json(submission): axum::Json<AdmissionSubmission>,
) -> Response {
    match service.submit(submission) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler(
    State(service): State<Arc<AdmissionService>>,
    Query(filter): Query<AdmissionFilter>,
) -> Response {
    match service.list(filter) {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsQuery {
    #[serde(default)]
    academic_year: Option<String>,
}

pub(crate) async fn stats_handler(
    State(service): State<Arc<AdmissionService>>,
    Query(query): Query<StatsQuery>,
) -> Response {
    let academic_year = query
        .academic_year
        .unwrap_or_else(|| Local::now().year().to_string());
    match service.stats(&academic_year) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler(
    State(service): State<Arc<AdmissionService>>,
    Path(admission_id): Path<String>,
) -> Response {
    match service.get(&AdmissionId(admission_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler(
    State(service): State<Arc<AdmissionService>>,
    Path(admission_id): Path<String>,
    axum::Json(update): axum::Json<AdmissionUpdate>,
) -> Response {
    match service.update(&AdmissionId(admission_id), update) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler(
    State(service): State<Arc<AdmissionService>>,
    Path(admission_id): Path<String>,
) -> Response {
    match service.delete(&AdmissionId(admission_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

/// Decision endpoint. An unknown status value fails `AdmissionDecision`
/// deserialization, so the handler never runs and nothing is mutated.
pub(crate) async fn decide_handler(
    State(service): State<Arc<AdmissionService>>,
    Path(admission_id): Path<String>,
    axum::Json(decision): axum::Json<AdmissionDecision>,
) -> Response {
    match service.decide(&AdmissionId(admission_id), decision) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AdmissionServiceError) -> Response {
    let status = match &error {
        AdmissionServiceError::UnknownCourse(_) => StatusCode::BAD_REQUEST,
        AdmissionServiceError::AlreadyConverted(_) => StatusCode::CONFLICT,
        AdmissionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AdmissionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AdmissionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
