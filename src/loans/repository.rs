use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ApplicantRecord, LoanApplicationId};
use super::scoring::ScoreOutcome;

/// Stored record for one submitted application. Scoring happens at intake,
/// so the outcome is always present.
#[derive(Debug, Clone, Serialize)]
pub struct LoanApplicationRecord {
    pub id: LoanApplicationId,
    pub record: ApplicantRecord,
    pub outcome: ScoreOutcome,
    pub submitted_at: DateTime<Utc>,
}

impl LoanApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            status: self.outcome.decision.label(),
            policy: self.outcome.policy.label(),
            probability: self.outcome.probability,
            probability_display: self.outcome.probability_display(),
            decision_rationale: self.outcome.rationale(),
            submitted_at: self.submitted_at,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    fn insert(
        &self,
        record: LoanApplicationRecord,
    ) -> Result<LoanApplicationRecord, RepositoryError>;
    fn fetch(&self, id: &LoanApplicationId)
        -> Result<Option<LoanApplicationRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<LoanApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-lifetime storage backing the server. The product persists nothing
/// across restarts; applications only live as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: Mutex<BTreeMap<LoanApplicationId, LoanApplicationRecord>>,
}

impl InMemoryRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<LoanApplicationId, LoanApplicationRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))
    }
}

impl ApplicationRepository for InMemoryRepository {
    fn insert(
        &self,
        record: LoanApplicationRecord,
    ) -> Result<LoanApplicationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(
        &self,
        id: &LoanApplicationId,
    ) -> Result<Option<LoanApplicationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LoanApplicationRecord>, RepositoryError> {
        let guard = self.lock()?;
        // Sequential ids sort chronologically, so the newest sit at the end.
        Ok(guard.values().rev().take(limit).cloned().collect())
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: LoanApplicationId,
    pub status: &'static str,
    pub policy: &'static str,
    pub probability: f64,
    pub probability_display: String,
    pub decision_rationale: String,
    pub submitted_at: DateTime<Utc>,
}
