//! Loan application intake and rule-based approval scoring.
//!
//! The heart of the crate is [`loans::scoring`], a deterministic additive
//! point system that maps an applicant record to an approval probability in
//! `[0, 1]`. Everything else (intake service, session gate, HTTP routes) is a
//! thin collaborator around that function.

pub mod config;
pub mod error;
pub mod loans;
pub mod telemetry;
