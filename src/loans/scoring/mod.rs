//! Rule-based approval scoring.
//!
//! Each policy is an additive point system: factors are evaluated
//! independently against the record, the first matching branch of each factor
//! wins, the weights are summed and the sum is clamped to `[0, 1]`. The
//! scorer is a total function: it never errors, never panics, and returns a
//! finite probability for any record, however malformed.

mod factors;
mod policy;

pub use factors::{ChoiceBranch, Comparison, Factor, FactorRule, NumericBranch, NumericInput};
pub use policy::{LoanDecision, PolicyKind, ScoringPolicy, APPROVAL_THRESHOLD};

use super::domain::ApplicantRecord;
use serde::Serialize;

/// Stateless scorer applying a named policy's factor table to a record.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    threshold: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            threshold: APPROVAL_THRESHOLD,
        }
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, record: &ApplicantRecord, kind: PolicyKind) -> ScoreOutcome {
        let policy = ScoringPolicy::for_kind(kind);

        let mut components = Vec::with_capacity(policy.factors().len());
        let mut total = 0.0_f64;
        for factor in policy.factors() {
            let (weight, notes) = factor.evaluate(record);
            total += weight;
            components.push(ScoreComponent {
                factor: factor.label,
                weight,
                notes,
            });
        }

        let probability = total.clamp(0.0, 1.0);
        let decision = if probability >= self.threshold {
            LoanDecision::Approved
        } else {
            LoanDecision::Denied
        };

        ScoreOutcome {
            policy: kind,
            probability,
            decision,
            components,
        }
    }

    /// Score with the policy inferred from the fields present on the record.
    pub fn score_detected(&self, record: &ApplicantRecord) -> ScoreOutcome {
        self.score(record, PolicyKind::detect(record))
    }
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub factor: &'static str,
    pub weight: f64,
    pub notes: String,
}

/// The scored result: probability, decision, and the component trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub policy: PolicyKind,
    pub probability: f64,
    pub decision: LoanDecision,
    pub components: Vec<ScoreComponent>,
}

impl ScoreOutcome {
    /// Percentage rendering used by the consuming views (two decimals).
    pub fn probability_display(&self) -> String {
        format!("{:.2}", self.probability * 100.0)
    }

    pub fn rationale(&self) -> String {
        format!(
            "{} ({}% probability)",
            self.decision.summary(),
            self.probability_display()
        )
    }

    pub fn view(&self) -> ScoreView {
        ScoreView {
            policy: self.policy.label(),
            probability: self.probability,
            probability_display: self.probability_display(),
            decision: self.decision.label(),
            decision_rationale: self.rationale(),
            components: self.components.clone(),
        }
    }
}

/// Serialized form of an outcome for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreView {
    pub policy: &'static str,
    pub probability: f64,
    pub probability_display: String,
    pub decision: &'static str,
    pub decision_rationale: String,
    pub components: Vec<ScoreComponent>,
}
