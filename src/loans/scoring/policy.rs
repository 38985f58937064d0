use serde::{Deserialize, Serialize};

use super::super::domain::{fields, ApplicantRecord};
use super::factors::{ChoiceBranch, Comparison, Factor, FactorRule, NumericBranch, NumericInput};

/// Probability at or above which an application is approved.
pub const APPROVAL_THRESHOLD: f64 = 0.5;

/// The two supported application form schemas. They are deliberately kept as
/// two named policies and never merged; each carries its own factor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Basic,
    Extended,
}

impl PolicyKind {
    pub const fn label(self) -> &'static str {
        match self {
            PolicyKind::Basic => "basic",
            PolicyKind::Extended => "extended",
        }
    }

    /// Pick a policy from the fields present on the record: any field that
    /// only exists on the extended form selects the extended policy.
    pub fn detect(record: &ApplicantRecord) -> Self {
        const EXTENDED_ONLY: &[&str] = &[
            fields::AGE,
            fields::MARITAL_STATUS,
            fields::DEPENDENTS,
            fields::EMPLOYMENT_TYPE,
            fields::EMPLOYMENT_LENGTH,
            fields::LOAN_PURPOSE,
            fields::EXISTING_LOANS,
            fields::MONTHLY_DEBT,
            fields::PROPERTY_VALUE,
        ];

        if EXTENDED_ONLY.iter().any(|field| record.contains(field)) {
            PolicyKind::Extended
        } else {
            PolicyKind::Basic
        }
    }
}

/// Adjudication outcome derived from the approval probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanDecision {
    Approved,
    Denied,
}

impl LoanDecision {
    pub const fn label(self) -> &'static str {
        match self {
            LoanDecision::Approved => "approved",
            LoanDecision::Denied => "denied",
        }
    }

    pub fn summary(&self) -> String {
        match self {
            LoanDecision::Approved => "application approved".to_string(),
            LoanDecision::Denied => "application denied".to_string(),
        }
    }
}

/// A named factor table. The table is declarative data so each policy can be
/// audited and tested independently of the engine that sums it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringPolicy {
    kind: PolicyKind,
    factors: &'static [Factor],
}

impl ScoringPolicy {
    pub fn for_kind(kind: PolicyKind) -> &'static ScoringPolicy {
        match kind {
            PolicyKind::Basic => &BASIC,
            PolicyKind::Extended => &EXTENDED,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        self.kind
    }

    pub fn factors(&self) -> &'static [Factor] {
        self.factors
    }
}

static BASIC: ScoringPolicy = ScoringPolicy {
    kind: PolicyKind::Basic,
    factors: BASIC_FACTORS,
};

static EXTENDED: ScoringPolicy = ScoringPolicy {
    kind: PolicyKind::Extended,
    factors: EXTENDED_FACTORS,
};

/// Six-field form: income, credit history, loan amount/term, education,
/// property area. Income and loan amount award a base weight even when the
/// field is absent or malformed.
const BASIC_FACTORS: &[Factor] = &[
    Factor {
        label: "income",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::INCOME),
            branches: &[
                NumericBranch {
                    when: Comparison::GreaterThan(7000.0),
                    weight: 0.30,
                },
                NumericBranch {
                    when: Comparison::GreaterThan(5000.0),
                    weight: 0.25,
                },
                NumericBranch {
                    when: Comparison::GreaterThan(3000.0),
                    weight: 0.20,
                },
            ],
            fallback: 0.10,
        },
    },
    Factor {
        label: "credit history",
        rule: FactorRule::Choice {
            field: fields::CREDIT_HISTORY,
            branches: &[ChoiceBranch {
                options: &["1"],
                weight: 0.20,
            }],
        },
    },
    Factor {
        label: "loan amount",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::LOAN_AMOUNT),
            branches: &[
                NumericBranch {
                    when: Comparison::LessThan(100_000.0),
                    weight: 0.15,
                },
                NumericBranch {
                    when: Comparison::LessThan(300_000.0),
                    weight: 0.10,
                },
            ],
            fallback: 0.05,
        },
    },
    Factor {
        label: "loan term",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::LOAN_TERM),
            branches: &[
                NumericBranch {
                    when: Comparison::AtMost(60.0),
                    weight: 0.10,
                },
                NumericBranch {
                    when: Comparison::AtMost(120.0),
                    weight: 0.05,
                },
            ],
            fallback: 0.0,
        },
    },
    Factor {
        label: "education",
        rule: FactorRule::Choice {
            field: fields::EDUCATION,
            branches: &[ChoiceBranch {
                options: &["Graduate"],
                weight: 0.10,
            }],
        },
    },
    Factor {
        label: "property area",
        rule: FactorRule::Choice {
            field: fields::PROPERTY_AREA,
            branches: &[
                ChoiceBranch {
                    options: &["Urban"],
                    weight: 0.10,
                },
                ChoiceBranch {
                    options: &["Semiurban"],
                    weight: 0.05,
                },
            ],
        },
    },
];

/// Seventeen-field form, including the two derived ratios (debt-to-income
/// and loan-to-value). No factor carries a fallback weight here.
const EXTENDED_FACTORS: &[Factor] = &[
    Factor {
        label: "age",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::AGE),
            branches: &[
                NumericBranch {
                    when: Comparison::Between(25.0, 45.0),
                    weight: 0.10,
                },
                NumericBranch {
                    when: Comparison::GreaterThan(45.0),
                    weight: 0.05,
                },
            ],
            fallback: 0.0,
        },
    },
    Factor {
        label: "marital status",
        rule: FactorRule::Choice {
            field: fields::MARITAL_STATUS,
            branches: &[ChoiceBranch {
                options: &["Married"],
                weight: 0.05,
            }],
        },
    },
    Factor {
        label: "dependents",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::DEPENDENTS),
            branches: &[NumericBranch {
                when: Comparison::AtMost(2.0),
                weight: 0.05,
            }],
            fallback: 0.0,
        },
    },
    Factor {
        label: "education",
        rule: FactorRule::Choice {
            field: fields::EDUCATION,
            branches: &[
                ChoiceBranch {
                    options: &["Bachelor", "Master", "PhD"],
                    weight: 0.10,
                },
                ChoiceBranch {
                    options: &["HighSchool"],
                    weight: 0.05,
                },
            ],
        },
    },
    Factor {
        label: "employment type",
        rule: FactorRule::Choice {
            field: fields::EMPLOYMENT_TYPE,
            branches: &[
                ChoiceBranch {
                    options: &["FullTime"],
                    weight: 0.10,
                },
                ChoiceBranch {
                    options: &["PartTime", "SelfEmployed"],
                    weight: 0.05,
                },
            ],
        },
    },
    Factor {
        label: "employment length",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::EMPLOYMENT_LENGTH),
            branches: &[NumericBranch {
                when: Comparison::GreaterThan(2.0),
                weight: 0.10,
            }],
            fallback: 0.0,
        },
    },
    Factor {
        label: "income",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::INCOME),
            branches: &[
                NumericBranch {
                    when: Comparison::GreaterThan(7000.0),
                    weight: 0.20,
                },
                NumericBranch {
                    when: Comparison::GreaterThan(5000.0),
                    weight: 0.15,
                },
                NumericBranch {
                    when: Comparison::GreaterThan(3000.0),
                    weight: 0.10,
                },
            ],
            fallback: 0.0,
        },
    },
    Factor {
        label: "loan amount",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::LOAN_AMOUNT),
            branches: &[
                NumericBranch {
                    when: Comparison::LessThan(100_000.0),
                    weight: 0.10,
                },
                NumericBranch {
                    when: Comparison::LessThan(300_000.0),
                    weight: 0.05,
                },
            ],
            fallback: 0.0,
        },
    },
    Factor {
        label: "loan term",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::LOAN_TERM),
            branches: &[NumericBranch {
                when: Comparison::AtMost(120.0),
                weight: 0.05,
            }],
            fallback: 0.0,
        },
    },
    Factor {
        label: "loan purpose",
        rule: FactorRule::Choice {
            field: fields::LOAN_PURPOSE,
            branches: &[ChoiceBranch {
                options: &["HomePurchase", "DebtConsolidation"],
                weight: 0.05,
            }],
        },
    },
    Factor {
        label: "credit history",
        rule: FactorRule::Choice {
            field: fields::CREDIT_HISTORY,
            branches: &[
                ChoiceBranch {
                    options: &["1"],
                    weight: 0.15,
                },
                ChoiceBranch {
                    options: &["2"],
                    weight: 0.10,
                },
            ],
        },
    },
    Factor {
        label: "existing loans",
        rule: FactorRule::Ladder {
            input: NumericInput::Field(fields::EXISTING_LOANS),
            branches: &[
                NumericBranch {
                    when: Comparison::EqualTo(0.0),
                    weight: 0.10,
                },
                NumericBranch {
                    when: Comparison::AtMost(2.0),
                    weight: 0.05,
                },
            ],
            fallback: 0.0,
        },
    },
    Factor {
        label: "debt-to-income",
        rule: FactorRule::Ladder {
            input: NumericInput::Ratio {
                numerator: fields::MONTHLY_DEBT,
                denominator: fields::INCOME,
            },
            branches: &[
                NumericBranch {
                    when: Comparison::LessThan(0.3),
                    weight: 0.10,
                },
                NumericBranch {
                    when: Comparison::LessThan(0.4),
                    weight: 0.05,
                },
            ],
            fallback: 0.0,
        },
    },
    Factor {
        label: "loan-to-value",
        rule: FactorRule::Ladder {
            input: NumericInput::Ratio {
                numerator: fields::LOAN_AMOUNT,
                denominator: fields::PROPERTY_VALUE,
            },
            branches: &[
                NumericBranch {
                    when: Comparison::LessThan(0.7),
                    weight: 0.10,
                },
                NumericBranch {
                    when: Comparison::LessThan(0.8),
                    weight: 0.05,
                },
            ],
            fallback: 0.0,
        },
    },
    Factor {
        label: "property area",
        rule: FactorRule::Choice {
            field: fields::PROPERTY_AREA,
            branches: &[ChoiceBranch {
                options: &["Urban", "Suburban"],
                weight: 0.05,
            }],
        },
    },
];
