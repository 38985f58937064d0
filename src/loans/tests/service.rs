use super::common::*;
use crate::loans::domain::{fields, LoanApplicationId};
use crate::loans::repository::RepositoryError;
use crate::loans::scoring::{LoanDecision, PolicyKind};
use crate::loans::service::ApplicationServiceError;

#[test]
fn submit_scores_at_intake_and_assigns_sequential_ids() {
    let context = build_context();

    let stored = context
        .service
        .submit(basic_strong_record(), None)
        .expect("submission stored");

    assert!(stored.id.0.starts_with("loan-"));
    assert_eq!(stored.outcome.policy, PolicyKind::Basic);
    assert_eq!(stored.outcome.decision, LoanDecision::Approved);

    let fetched = context.service.get(&stored.id).expect("record fetched");
    assert_eq!(fetched.outcome, stored.outcome);
}

#[test]
fn get_unknown_application_reports_not_found() {
    let context = build_context();
    let missing = LoanApplicationId("loan-999999".to_string());

    match context.service.get(&missing) {
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[test]
fn what_if_rescores_without_mutating_the_stored_record() {
    let context = build_context();
    let stored = context
        .service
        .submit(basic_weak_record(), None)
        .expect("submission stored");
    let original_probability = stored.outcome.probability;

    let edited = basic_weak_record().with_number(fields::INCOME, 8000.0);
    let what_if = context
        .service
        .what_if(&stored.id, &edited)
        .expect("what-if rescored");

    assert!(what_if.probability > original_probability);

    let fetched = context.service.get(&stored.id).expect("record fetched");
    assert!((fetched.outcome.probability - original_probability).abs() < EPSILON);
}

#[test]
fn what_if_keeps_the_original_policy() {
    let context = build_context();
    let stored = context
        .service
        .submit(basic_weak_record(), Some(PolicyKind::Basic))
        .expect("submission stored");

    // Adding extended-only fields must not switch the policy mid-exploration.
    let edited = basic_weak_record()
        .with_number(fields::AGE, 30.0)
        .with_text(fields::MARITAL_STATUS, "Married");
    let what_if = context
        .service
        .what_if(&stored.id, &edited)
        .expect("what-if rescored");

    assert_eq!(what_if.policy, PolicyKind::Basic);
    assert!((what_if.probability - stored.outcome.probability).abs() < EPSILON);
}

#[test]
fn preview_never_persists() {
    let context = build_context();

    let outcome = context.service.preview(&extended_strong_record(), None);
    assert_eq!(outcome.policy, PolicyKind::Extended);

    let recent = context.service.recent(10).expect("recent listed");
    assert!(recent.is_empty());
}

#[test]
fn recent_returns_newest_first() {
    let context = build_context();
    let first = context
        .service
        .submit(basic_weak_record(), None)
        .expect("first stored");
    let second = context
        .service
        .submit(basic_strong_record(), None)
        .expect("second stored");

    let recent = context.service.recent(10).expect("recent listed");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, second.id);
    assert_eq!(recent[1].id, first.id);
}
