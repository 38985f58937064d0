use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::loans::domain::{fields, ApplicantRecord};
use crate::loans::repository::InMemoryRepository;
use crate::loans::router::{loan_router, LoanApiContext};
use crate::loans::scoring::ScoringEngine;
use crate::loans::service::LoanApplicationService;
use crate::loans::session::{Credentials, SessionStore};

pub(super) const EPSILON: f64 = 1e-9;

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new()
}

/// Basic-form record with every factor at its best branch; scores 0.95.
pub(super) fn basic_strong_record() -> ApplicantRecord {
    ApplicantRecord::new()
        .with_number(fields::INCOME, 8000.0)
        .with_text(fields::CREDIT_HISTORY, "1")
        .with_number(fields::LOAN_AMOUNT, 50_000.0)
        .with_number(fields::LOAN_TERM, 60.0)
        .with_text(fields::EDUCATION, "Graduate")
        .with_text(fields::PROPERTY_AREA, "Urban")
}

/// Basic-form record hitting only base weights; scores 0.15.
pub(super) fn basic_weak_record() -> ApplicantRecord {
    ApplicantRecord::new()
        .with_number(fields::INCOME, 2000.0)
        .with_text(fields::CREDIT_HISTORY, "0")
        .with_number(fields::LOAN_AMOUNT, 400_000.0)
        .with_number(fields::LOAN_TERM, 300.0)
        .with_text(fields::EDUCATION, "Not Graduate")
        .with_text(fields::PROPERTY_AREA, "Rural")
}

/// Extended-form record where every factor contributes zero.
pub(super) fn extended_zero_record() -> ApplicantRecord {
    ApplicantRecord::new()
        .with_number(fields::AGE, 17.0)
        .with_text(fields::MARITAL_STATUS, "Single")
        .with_number(fields::DEPENDENTS, 5.0)
        .with_text(fields::EDUCATION, "Illiterate")
        .with_text(fields::EMPLOYMENT_TYPE, "Unemployed")
        .with_number(fields::EMPLOYMENT_LENGTH, 0.0)
        .with_number(fields::INCOME, 1000.0)
        .with_number(fields::LOAN_AMOUNT, 500_000.0)
        .with_number(fields::LOAN_TERM, 360.0)
        .with_text(fields::LOAN_PURPOSE, "Other")
        .with_text(fields::CREDIT_HISTORY, "0")
        .with_number(fields::EXISTING_LOANS, 5.0)
        .with_number(fields::MONTHLY_DEBT, 5000.0)
        .with_number(fields::PROPERTY_VALUE, 50_000.0)
        .with_text(fields::PROPERTY_AREA, "Rural")
}

/// Extended-form record whose raw factor sum is 1.40, exercising the clamp.
pub(super) fn extended_strong_record() -> ApplicantRecord {
    ApplicantRecord::new()
        .with_number(fields::AGE, 30.0)
        .with_text(fields::MARITAL_STATUS, "Married")
        .with_number(fields::DEPENDENTS, 1.0)
        .with_text(fields::EDUCATION, "Master")
        .with_text(fields::EMPLOYMENT_TYPE, "FullTime")
        .with_number(fields::EMPLOYMENT_LENGTH, 5.0)
        .with_number(fields::INCOME, 8000.0)
        .with_number(fields::LOAN_AMOUNT, 90_000.0)
        .with_number(fields::LOAN_TERM, 120.0)
        .with_text(fields::LOAN_PURPOSE, "HomePurchase")
        .with_text(fields::CREDIT_HISTORY, "1")
        .with_number(fields::EXISTING_LOANS, 0.0)
        .with_number(fields::MONTHLY_DEBT, 2000.0)
        .with_number(fields::PROPERTY_VALUE, 200_000.0)
        .with_text(fields::PROPERTY_AREA, "Urban")
}

pub(super) fn credentials() -> Credentials {
    Credentials {
        username: "user".to_string(),
        password: "password".to_string(),
    }
}

pub(super) fn build_context() -> Arc<LoanApiContext<InMemoryRepository>> {
    let repository = Arc::new(InMemoryRepository::default());
    Arc::new(LoanApiContext {
        service: LoanApplicationService::new(repository),
        sessions: SessionStore::new(credentials()),
    })
}

pub(super) fn router_with_context(
    context: Arc<LoanApiContext<InMemoryRepository>>,
) -> axum::Router {
    loan_router(context)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
