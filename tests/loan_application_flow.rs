use std::sync::Arc;

use loansight::loans::{
    ApplicantRecord, Credentials, InMemoryRepository, LoanApiContext, LoanApplicationService,
    LoanDecision, PolicyKind, SessionStore, APPROVAL_THRESHOLD,
};

fn loan_service() -> LoanApplicationService<InMemoryRepository> {
    LoanApplicationService::new(Arc::new(InMemoryRepository::default()))
}

fn basic_record(income: f64) -> ApplicantRecord {
    ApplicantRecord::new()
        .with_number("income", income)
        .with_text("creditHistory", "1")
        .with_number("loanAmount", 50_000.0)
        .with_number("loanTerm", 60.0)
        .with_text("education", "Graduate")
        .with_text("propertyArea", "Urban")
}

#[test]
fn end_to_end_submission_scores_and_classifies() {
    let service = loan_service();

    let strong = service
        .submit(basic_record(8000.0), None)
        .expect("strong submission stored");
    assert_eq!(strong.outcome.decision, LoanDecision::Approved);
    assert!(strong.outcome.probability >= APPROVAL_THRESHOLD);
    assert_eq!(strong.outcome.probability_display(), "95.00");

    let weak_record = ApplicantRecord::new()
        .with_number("income", 2000.0)
        .with_text("creditHistory", "0")
        .with_number("loanAmount", 400_000.0)
        .with_number("loanTerm", 300.0)
        .with_text("education", "Not Graduate")
        .with_text("propertyArea", "Rural");
    let weak = service
        .submit(weak_record, None)
        .expect("weak submission stored");
    assert_eq!(weak.outcome.decision, LoanDecision::Denied);
    assert_eq!(weak.outcome.probability_display(), "15.00");
}

#[test]
fn what_if_exploration_leaves_the_application_intact() {
    let service = loan_service();
    let stored = service
        .submit(basic_record(2000.0), None)
        .expect("submission stored");

    let outcome = service
        .what_if(&stored.id, &basic_record(8000.0))
        .expect("what-if rescored");
    assert!(outcome.probability > stored.outcome.probability);

    let fetched = service.get(&stored.id).expect("record fetched");
    assert_eq!(fetched.outcome.probability, stored.outcome.probability);
}

#[test]
fn extended_policy_handles_degenerate_denominators() {
    let service = loan_service();
    let record = ApplicantRecord::new()
        .with_number("age", 30.0)
        .with_number("income", 0.0)
        .with_number("monthlyDebt", 5000.0)
        .with_number("loanAmount", 100_000.0)
        .with_number("propertyValue", 0.0);

    let outcome = service.preview(&record, None);

    assert_eq!(outcome.policy, PolicyKind::Extended);
    assert!(outcome.probability.is_finite());
    assert!((0.0..=1.0).contains(&outcome.probability));
}

#[test]
fn session_gate_has_explicit_lifecycle() {
    let context = LoanApiContext {
        service: loan_service(),
        sessions: SessionStore::new(Credentials {
            username: "user".to_string(),
            password: "password".to_string(),
        }),
    };

    let session = context
        .sessions
        .login("user", "password")
        .expect("login succeeds");
    assert!(context.sessions.authorize(&session.token).is_ok());

    context.sessions.logout(&session.token).expect("logout");
    assert!(context.sessions.authorize(&session.token).is_err());
}
