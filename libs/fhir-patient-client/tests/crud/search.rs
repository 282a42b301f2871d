//! SEARCH (GET /Patient?name=...)

use crate::support::{patient_resource, search_bundle, session_with_selection, test_session, BASE_URL};
use ferrum_patient_client::{FailureKind, Outcome, Severity};
use reqwest::Method;

#[tokio::test]
async fn search_with_no_matches_is_empty_result() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport.respond(200, search_bundle(vec![]));

    let outcome = ts.session.search_by_name("Smith").await;

    let Outcome::Results(patients) = &outcome else {
        panic!("expected Results, got {:?}", outcome);
    };
    assert!(patients.is_empty());
    assert!(outcome.is_success());
    assert_eq!(ts.sink.last().1, Severity::Success);
    Ok(())
}

#[tokio::test]
async fn search_sends_name_parameter() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport.respond(200, search_bundle(vec![]));

    ts.session.search_by_name("  van der Berg ").await;

    let request = ts.transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, format!("{}/Patient", BASE_URL));
    assert_eq!(
        request.query,
        vec![("name".to_string(), "van der Berg".to_string())]
    );
    assert_eq!(
        request.full_url(),
        format!("{}/Patient?name=van%20der%20Berg", BASE_URL)
    );
    Ok(())
}

#[tokio::test]
async fn search_returns_entries_in_order_without_selecting() -> anyhow::Result<()> {
    let mut ts = session_with_selection().await;
    ts.transport.respond(
        200,
        search_bundle(vec![
            patient_resource("1", "John", "Smith"),
            patient_resource("2", "Jane", "Smith"),
        ]),
    );

    let outcome = ts.session.search_by_name("Smith").await;

    let Outcome::Results(patients) = &outcome else {
        panic!("expected Results, got {:?}", outcome);
    };
    let names: Vec<String> = patients.iter().map(|p| p.display_name()).collect();
    assert_eq!(names, vec!["John Smith", "Jane Smith"]);
    assert_eq!(
        ts.session.selected().and_then(|p| p.id.as_deref()),
        Some("42")
    );
    Ok(())
}

#[tokio::test]
async fn search_skips_malformed_entries() -> anyhow::Result<()> {
    let mut ts = test_session();
    let mut broken = patient_resource("2", "Bad", "Record");
    broken["telecom"] = serde_json::json!([{"system": "carrier-pigeon", "value": "coop 4"}]);
    ts.transport.respond(
        200,
        search_bundle(vec![
            patient_resource("1", "John", "Smith"),
            broken,
            patient_resource("3", "Jane", "Smith"),
        ]),
    );

    let outcome = ts.session.search_by_name("Smith").await;

    let Outcome::Results(patients) = &outcome else {
        panic!("expected Results, got {:?}", outcome);
    };
    let ids: Vec<_> = patients.iter().filter_map(|p| p.id.as_deref()).collect();
    assert_eq!(ids, vec!["1", "3"]);
    Ok(())
}

#[tokio::test]
async fn search_blank_term_is_precondition_failure() -> anyhow::Result<()> {
    let mut ts = test_session();

    let outcome = ts.session.search_by_name("").await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Precondition));
    assert!(ts.transport.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn search_server_error_is_transport_failure() -> anyhow::Result<()> {
    let mut ts = test_session();
    ts.transport.respond_raw(400, "Unknown search parameter");

    let outcome = ts.session.search_by_name("Smith").await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    assert!(ts.sink.last().0.contains("400"));
    Ok(())
}
