use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{ApplicantRecord, LoanApplicationId};
use super::repository::{ApplicationRepository, LoanApplicationRecord, RepositoryError};
use super::scoring::{PolicyKind, ScoreOutcome, ScoringEngine};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> LoanApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LoanApplicationId(format!("loan-{id:06}"))
}

/// Service composing the scoring engine and the application repository.
pub struct LoanApplicationService<R> {
    repository: Arc<R>,
    engine: ScoringEngine,
}

impl<R> LoanApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            engine: ScoringEngine::new(),
        }
    }

    /// Stateless scoring call, used per keystroke by the live preview. The
    /// record is not stored.
    pub fn preview(&self, record: &ApplicantRecord, policy: Option<PolicyKind>) -> ScoreOutcome {
        let kind = policy.unwrap_or_else(|| PolicyKind::detect(record));
        self.engine.score(record, kind)
    }

    /// Submit an application: score it at intake and persist the outcome.
    pub fn submit(
        &self,
        record: ApplicantRecord,
        policy: Option<PolicyKind>,
    ) -> Result<LoanApplicationRecord, ApplicationServiceError> {
        let outcome = self.preview(&record, policy);
        let stored = self.repository.insert(LoanApplicationRecord {
            id: next_application_id(),
            record,
            outcome,
            submitted_at: Utc::now(),
        })?;
        Ok(stored)
    }

    /// Fetch an application and its scored status for API responses.
    pub fn get(
        &self,
        id: &LoanApplicationId,
    ) -> Result<LoanApplicationRecord, ApplicationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Re-score an edited copy of a previously submitted record, using the
    /// same policy that scored the original. Nothing is persisted; the
    /// stored application is left untouched.
    pub fn what_if(
        &self,
        id: &LoanApplicationId,
        edited: &ApplicantRecord,
    ) -> Result<ScoreOutcome, ApplicationServiceError> {
        let stored = self.get(id)?;
        Ok(self.engine.score(edited, stored.outcome.policy))
    }

    /// Most recently submitted applications, newest first.
    pub fn recent(
        &self,
        limit: usize,
    ) -> Result<Vec<LoanApplicationRecord>, ApplicationServiceError> {
        Ok(self.repository.recent(limit)?)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
