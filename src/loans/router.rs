use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicantRecord, LoanApplicationId};
use super::repository::{ApplicationRepository, RepositoryError};
use super::scoring::PolicyKind;
use super::service::{ApplicationServiceError, LoanApplicationService};
use super::session::{SessionError, SessionStore};

const RECENT_LIMIT: usize = 50;

/// Shared state for the loan API: the intake service plus the session gate.
pub struct LoanApiContext<R> {
    pub service: LoanApplicationService<R>,
    pub sessions: SessionStore,
}

/// Router builder exposing the session gate, the live score preview, and the
/// application intake endpoints.
pub fn loan_router<R>(context: Arc<LoanApiContext<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/session/login", post(login_handler::<R>))
        .route("/api/v1/session/logout", post(logout_handler::<R>))
        .route("/api/v1/loans/score", post(score_handler::<R>))
        .route(
            "/api/v1/loans/applications",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/loans/applications/:application_id",
            get(status_handler::<R>),
        )
        .route(
            "/api/v1/loans/applications/:application_id/what-if",
            post(what_if_handler::<R>),
        )
        .with_state(context)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub record: ApplicantRecord,
    #[serde(default)]
    pub policy: Option<PolicyKind>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WhatIfRequest {
    pub record: ApplicantRecord,
}

pub(crate) async fn login_handler<R>(
    State(context): State<Arc<LoanApiContext<R>>>,
    axum::Json(payload): axum::Json<LoginRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match context.sessions.login(&payload.username, &payload.password) {
        Ok(session) => {
            let body = json!({
                "token": session.token,
                "username": session.username,
                "issued_at": session.issued_at,
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(SessionError::InvalidCredentials) => {
            error_response(StatusCode::UNAUTHORIZED, "invalid username or password")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

pub(crate) async fn logout_handler<R>(
    State(context): State<Arc<LoanApiContext<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return error_response(StatusCode::UNAUTHORIZED, "missing bearer token");
    };

    match context.sessions.logout(token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(SessionError::Unauthorized) => {
            error_response(StatusCode::UNAUTHORIZED, "missing or unknown session token")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

pub(crate) async fn score_handler<R>(
    State(context): State<Arc<LoanApiContext<R>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<ScoreRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if let Err(response) = authenticate(&context.sessions, &headers) {
        return response;
    }

    let outcome = context.service.preview(&payload.record, payload.policy);
    (StatusCode::OK, axum::Json(outcome.view())).into_response()
}

pub(crate) async fn submit_handler<R>(
    State(context): State<Arc<LoanApiContext<R>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<ScoreRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if let Err(response) = authenticate(&context.sessions, &headers) {
        return response;
    }

    match context.service.submit(payload.record, payload.policy) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored.status_view())).into_response(),
        Err(ApplicationServiceError::Repository(RepositoryError::Conflict)) => {
            error_response(StatusCode::CONFLICT, "application already exists")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

pub(crate) async fn list_handler<R>(
    State(context): State<Arc<LoanApiContext<R>>>,
    headers: HeaderMap,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if let Err(response) = authenticate(&context.sessions, &headers) {
        return response;
    }

    match context.service.recent(RECENT_LIMIT) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(json!({ "applications": views }))).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

pub(crate) async fn status_handler<R>(
    State(context): State<Arc<LoanApiContext<R>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if let Err(response) = authenticate(&context.sessions, &headers) {
        return response;
    }

    let id = LoanApplicationId(application_id);
    match context.service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {
            error_response(StatusCode::NOT_FOUND, "application not found")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

pub(crate) async fn what_if_handler<R>(
    State(context): State<Arc<LoanApiContext<R>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    axum::Json(payload): axum::Json<WhatIfRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    if let Err(response) = authenticate(&context.sessions, &headers) {
        return response;
    }

    let id = LoanApplicationId(application_id);
    match context.service.what_if(&id, &payload.record) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome.view())).into_response(),
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {
            error_response(StatusCode::NOT_FOUND, "application not found")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other.to_string()),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authenticate(sessions: &SessionStore, headers: &HeaderMap) -> Result<(), Response> {
    let Some(token) = bearer_token(headers) else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "missing bearer token",
        ));
    };

    sessions.authorize(token).map(|_| ()).map_err(|error| match error {
        SessionError::Unavailable(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string())
        }
        _ => error_response(StatusCode::UNAUTHORIZED, &error.to_string()),
    })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let payload = json!({ "error": message });
    (status, axum::Json(payload)).into_response()
}
