//! Loan application intake, scoring, and session gating.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{ApplicantRecord, FieldValue, LoanApplicationId};
pub use repository::{
    ApplicationRepository, ApplicationStatusView, InMemoryRepository, LoanApplicationRecord,
    RepositoryError,
};
pub use router::{loan_router, LoanApiContext};
pub use scoring::{
    LoanDecision, PolicyKind, ScoreComponent, ScoreOutcome, ScoreView, ScoringEngine,
    ScoringPolicy, APPROVAL_THRESHOLD,
};
pub use service::{ApplicationServiceError, LoanApplicationService};
pub use session::{Credentials, Session, SessionError, SessionStore};
