//! CREATE (POST /Patient) and submit routing

use crate::support::{
    ada_fields, ada_resource, operation_outcome, session_with_selection, test_session, BASE_URL,
};
use ferrum_patient_client::fields::{BIRTH_DATE, EMAIL, FIRST_NAME, GENDER, LAST_NAME, PHONE};
use ferrum_patient_client::{
    Error, FailureKind, Outcome, SessionMode, Severity, ValidationError,
};
use reqwest::Method;

#[tokio::test]
async fn create_selects_returned_patient() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport.respond(201, ada_resource("42"));

    let outcome = ts.session.create(&ada_fields()).await;

    let Outcome::Created(created) = &outcome else {
        panic!("expected Created, got {:?}", outcome);
    };
    assert_eq!(created.id.as_deref(), Some("42"));
    assert_eq!(
        ts.session.selected().and_then(|p| p.id.as_deref()),
        Some("42")
    );
    assert_eq!(ts.session.mode(), SessionMode::Editing);

    let request = ts.transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, format!("{}/Patient", BASE_URL));
    let body = request.body.expect("create must send a body");
    assert_eq!(body["resourceType"], "Patient");
    assert_eq!(body["active"], true);
    assert_eq!(body["name"][0]["family"], "Lovelace");
    assert_eq!(body["name"][0]["given"][0], "Ada");
    assert!(body.get("id").is_none(), "builder never sets an id");

    Ok(())
}

#[tokio::test]
async fn create_reports_start_and_result() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport.respond(201, ada_resource("42"));

    ts.session.create(&ada_fields()).await;

    let messages = ts.sink.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].1, Severity::Info);
    let (message, severity) = &messages[1];
    assert_eq!(*severity, Severity::Success);
    assert!(message.contains("Ada Lovelace"), "{message}");
    assert!(message.contains("42"), "{message}");

    Ok(())
}

#[tokio::test]
async fn create_with_blank_required_field_sends_nothing() -> anyhow::Result<()> {
    let cases = [
        (FIRST_NAME, ValidationError::FirstNameRequired),
        (LAST_NAME, ValidationError::LastNameRequired),
        (GENDER, ValidationError::GenderRequired),
        (BIRTH_DATE, ValidationError::BirthDateRequired),
    ];

    for (field, expected) in cases {
        let mut ts = test_session();
        let outcome = ts.session.create(&ada_fields().with(field, "")).await;

        assert!(
            matches!(&outcome, Outcome::Failed(Error::Validation(e)) if *e == expected),
            "blank {field}: {outcome:?}"
        );
        assert!(ts.transport.requests().is_empty());
        assert!(ts.session.selected().is_none());
        assert_eq!(ts.sink.last().1, Severity::Error);
    }

    Ok(())
}

#[tokio::test]
async fn create_rejects_future_birth_date_and_bad_contacts() -> anyhow::Result<()> {
    let mut ts = test_session();

    let outcome = ts
        .session
        .create(&ada_fields().with(BIRTH_DATE, "2024-06-02"))
        .await;
    assert!(matches!(
        outcome,
        Outcome::Failed(Error::Validation(ValidationError::BirthDateInFuture))
    ));

    let outcome = ts.session.create(&ada_fields().with(EMAIL, "ada@")).await;
    assert!(matches!(
        outcome,
        Outcome::Failed(Error::Validation(ValidationError::InvalidEmail))
    ));

    let outcome = ts.session.create(&ada_fields().with(PHONE, "0123")).await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));

    assert!(ts.transport.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn create_failure_keeps_previous_selection() -> anyhow::Result<()> {
    let mut ts = session_with_selection().await;
    ts.transport
        .respond(422, operation_outcome("Unprocessable Patient"));

    let outcome = ts.session.create(&ada_fields()).await;

    match &outcome {
        Outcome::Failed(Error::Status { status, body }) => {
            assert_eq!(*status, 422);
            assert!(body.contains("Unprocessable Patient"));
        }
        other => panic!("expected status failure, got {:?}", other),
    }
    assert_eq!(
        ts.session.selected().and_then(|p| p.id.as_deref()),
        Some("42")
    );
    assert!(ts.sink.last().0.contains("422"));

    Ok(())
}

#[tokio::test]
async fn create_with_unreadable_body_is_transport_failure() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport.respond_raw(201, "");

    let outcome = ts.session.create(&ada_fields()).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    assert!(ts.session.selected().is_none());
    Ok(())
}

#[tokio::test]
async fn create_network_error_is_reported_not_raised() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport
        .fail(Error::MalformedResponse("connection reset".to_string()));

    let outcome = ts.session.create(&ada_fields()).await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    assert_eq!(ts.sink.last().1, Severity::Error);
    Ok(())
}

#[tokio::test]
async fn submit_routes_by_selection() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport.respond(201, ada_resource("42"));
    ts.transport.respond(200, ada_resource("42"));

    let first = ts.session.submit(&ada_fields()).await;
    assert!(matches!(first, Outcome::Created(_)));

    let second = ts.session.submit(&ada_fields()).await;
    assert!(matches!(second, Outcome::Updated(_)));

    let methods: Vec<Method> = ts
        .transport
        .requests()
        .into_iter()
        .map(|r| r.method)
        .collect();
    assert_eq!(methods, vec![Method::POST, Method::PUT]);
    Ok(())
}

#[tokio::test]
async fn base_url_trailing_slash_is_dropped() -> anyhow::Result<()> {
    use crate::support::{MockTransport, RecordingSink};
    use ferrum_patient_client::PatientSession;
    use std::sync::Arc;

    let transport = MockTransport::new();
    let session = PatientSession::new(
        "http://fhir.test/baseR4/",
        transport.clone(),
        Arc::new(RecordingSink::default()),
    );
    assert_eq!(session.base_url(), BASE_URL);
    Ok(())
}
