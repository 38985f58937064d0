use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted loan applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanApplicationId(pub String);

/// A single form field value. Numbers stay numeric; everything else is text.
///
/// The wire representation is untagged, so an applicant record is a plain
/// JSON object such as `{"income": 8000, "creditHistory": "1"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

/// One applicant's form data, keyed by field name.
///
/// The field set is open: scoring never validates it and unknown fields are
/// simply ignored by every factor table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantRecord(pub BTreeMap<String, FieldValue>);

impl ApplicantRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.0.insert(key.into(), FieldValue::Number(value));
        self
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), FieldValue::Text(value.into()));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Coerce a field to a float. A missing field, or text that does not
    /// parse as a number, yields `NaN`; every threshold comparison against
    /// `NaN` is false, so such a factor falls through its whole ladder.
    pub fn number(&self, key: &str) -> f64 {
        match self.0.get(key) {
            Some(FieldValue::Number(value)) => *value,
            Some(FieldValue::Text(raw)) => raw.trim().parse::<f64>().unwrap_or(f64::NAN),
            None => f64::NAN,
        }
    }

    /// Text access for enumeration fields. Numeric values never match a text
    /// option (`creditHistory: 1` is not `creditHistory: "1"`).
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(FieldValue::Text(raw)) => Some(raw.as_str()),
            _ => None,
        }
    }
}

/// Canonical field names shared by the two application form schemas.
pub mod fields {
    pub const INCOME: &str = "income";
    pub const CREDIT_HISTORY: &str = "creditHistory";
    pub const LOAN_AMOUNT: &str = "loanAmount";
    pub const LOAN_TERM: &str = "loanTerm";
    pub const EDUCATION: &str = "education";
    pub const PROPERTY_AREA: &str = "propertyArea";
    pub const AGE: &str = "age";
    pub const MARITAL_STATUS: &str = "maritalStatus";
    pub const DEPENDENTS: &str = "dependents";
    pub const EMPLOYMENT_TYPE: &str = "employmentType";
    pub const EMPLOYMENT_LENGTH: &str = "employmentLength";
    pub const LOAN_PURPOSE: &str = "loanPurpose";
    pub const EXISTING_LOANS: &str = "existingLoans";
    pub const MONTHLY_DEBT: &str = "monthlyDebt";
    pub const PROPERTY_VALUE: &str = "propertyValue";
}
