use std::fmt;

use super::super::domain::ApplicantRecord;

/// Threshold test applied to a coerced numeric input.
///
/// All comparisons are false when the input is `NaN`, so a missing or
/// non-numeric field falls through the whole ladder without erroring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    GreaterThan(f64),
    LessThan(f64),
    AtMost(f64),
    Between(f64, f64),
    EqualTo(f64),
}

impl Comparison {
    pub(crate) fn matches(self, value: f64) -> bool {
        match self {
            Comparison::GreaterThan(limit) => value > limit,
            Comparison::LessThan(limit) => value < limit,
            Comparison::AtMost(limit) => value <= limit,
            Comparison::Between(low, high) => value >= low && value <= high,
            Comparison::EqualTo(expected) => value == expected,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::GreaterThan(limit) => write!(f, "> {limit}"),
            Comparison::LessThan(limit) => write!(f, "< {limit}"),
            Comparison::AtMost(limit) => write!(f, "<= {limit}"),
            Comparison::Between(low, high) => write!(f, "between {low} and {high}"),
            Comparison::EqualTo(expected) => write!(f, "== {expected}"),
        }
    }
}

/// Where a numeric ladder reads its input from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericInput {
    Field(&'static str),
    /// Derived quotient (e.g. debt-to-income). Division by zero or by `NaN`
    /// follows IEEE semantics; the resulting Inf/NaN fails every `<`
    /// threshold and the factor contributes nothing.
    Ratio {
        numerator: &'static str,
        denominator: &'static str,
    },
}

impl NumericInput {
    fn resolve(&self, record: &ApplicantRecord) -> f64 {
        match self {
            NumericInput::Field(name) => record.number(name),
            NumericInput::Ratio {
                numerator,
                denominator,
            } => record.number(numerator) / record.number(denominator),
        }
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericInput::Field(name) => write!(f, "{name}"),
            NumericInput::Ratio {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
        }
    }
}

/// One rung of a numeric ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBranch {
    pub when: Comparison,
    pub weight: f64,
}

/// One option set of a text-enumeration rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChoiceBranch {
    pub options: &'static [&'static str],
    pub weight: f64,
}

/// How a factor inspects the record. Branches are ordered if/else-if style;
/// the first matching branch wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorRule {
    /// Threshold ladder over a numeric input. `fallback` is awarded when no
    /// branch matches, including the NaN case (the original form's `else`
    /// arm applies to unparseable input too).
    Ladder {
        input: NumericInput,
        branches: &'static [NumericBranch],
        fallback: f64,
    },
    /// First branch whose option set contains the field's text wins.
    Choice {
        field: &'static str,
        branches: &'static [ChoiceBranch],
    },
}

/// One independent scoring rule contributing a fixed weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor {
    pub label: &'static str,
    pub rule: FactorRule,
}

impl Factor {
    /// Evaluate against a record, returning the awarded weight and an audit
    /// note. Total over any record: never panics, weight is always finite.
    pub(crate) fn evaluate(&self, record: &ApplicantRecord) -> (f64, String) {
        match &self.rule {
            FactorRule::Ladder {
                input,
                branches,
                fallback,
            } => {
                let value = input.resolve(record);
                for branch in branches.iter() {
                    if branch.when.matches(value) {
                        return (
                            branch.weight,
                            format!("{input} {value:.2} matched {}", branch.when),
                        );
                    }
                }
                if *fallback > 0.0 {
                    (*fallback, format!("{input} {value:.2} took the base weight"))
                } else {
                    (0.0, format!("{input} {value:.2} outside all thresholds"))
                }
            }
            FactorRule::Choice { field, branches } => {
                if let Some(text) = record.text(field) {
                    for branch in branches.iter() {
                        if branch.options.iter().any(|option| *option == text) {
                            return (branch.weight, format!("{field} is {text}"));
                        }
                    }
                }
                (0.0, format!("{field} has no qualifying value"))
            }
        }
    }
}
