//! UPDATE (PUT /Patient/{id}) of the selected patient

use crate::support::{
    ada_fields, ada_resource, operation_outcome, session_with_selection, test_session, BASE_URL,
};
use ferrum_patient_client::fields::{EMAIL, LAST_NAME, PHONE};
use ferrum_patient_client::{Error, FailureKind, Outcome, RawFields, ValidationError};
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn update_without_selection_sends_nothing() -> anyhow::Result<()> {
    let inputs = [ada_fields(), RawFields::new(), ada_fields().with(EMAIL, "bad")];

    for raw in inputs {
        let mut ts = test_session();
        let outcome = ts.session.update_selected(&raw).await;

        assert!(
            matches!(&outcome, Outcome::Failed(Error::Precondition(msg)) if msg == "No patient selected"),
            "{outcome:?}"
        );
        assert!(ts.transport.requests().is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn update_puts_rebuilt_resource_with_selected_id() -> anyhow::Result<()> {
    let mut ts = session_with_selection().await;
    let mut returned = ada_resource("42");
    returned["name"][0]["family"] = json!("King");
    returned["meta"]["versionId"] = json!("2");
    ts.transport.respond(200, returned);

    let raw = ada_fields()
        .with(LAST_NAME, "King")
        .with(PHONE, "+44 20 7946 0000");
    let outcome = ts.session.update_selected(&raw).await;

    assert!(matches!(outcome, Outcome::Updated(_)), "{outcome:?}");

    let request = ts.transport.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.url, format!("{}/Patient/42", BASE_URL));
    let body = request.body.expect("update must send a body");
    assert_eq!(body["id"], "42");
    assert_eq!(body["name"][0]["family"], "King");
    assert_eq!(body["telecom"][0]["system"], "phone");
    assert!(body.get("meta").is_none(), "server metadata is not echoed back");

    let selected = ts.session.selected().expect("selection kept");
    assert_eq!(selected.display_name(), "Ada King");
    assert_eq!(selected.extensions["meta"]["versionId"], "2");
    Ok(())
}

#[tokio::test]
async fn update_validation_failure_keeps_selection() -> anyhow::Result<()> {
    let mut ts = session_with_selection().await;
    let before = ts.session.selected().cloned();

    let outcome = ts
        .session
        .update_selected(&ada_fields().with(LAST_NAME, " "))
        .await;

    assert!(matches!(
        outcome,
        Outcome::Failed(Error::Validation(ValidationError::LastNameRequired))
    ));
    assert_eq!(ts.session.selected().cloned(), before);
    assert_eq!(ts.transport.requests().len(), 1, "only the setup create");
    Ok(())
}

#[tokio::test]
async fn update_server_failure_keeps_selection() -> anyhow::Result<()> {
    let mut ts = session_with_selection().await;
    let before = ts.session.selected().cloned();
    ts.transport.respond(409, operation_outcome("Version conflict"));

    let outcome = ts
        .session
        .update_selected(&ada_fields().with(LAST_NAME, "King"))
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    assert_eq!(outcome.error().and_then(Error::status), Some(409));
    assert_eq!(ts.session.selected().cloned(), before);
    Ok(())
}

#[tokio::test]
async fn update_with_empty_response_selects_sent_resource() -> anyhow::Result<()> {
    let mut ts = session_with_selection().await;
    ts.transport.respond_raw(200, "");

    let outcome = ts
        .session
        .update_selected(&ada_fields().with(LAST_NAME, "King"))
        .await;

    assert!(matches!(outcome, Outcome::Updated(_)));
    let selected = ts.session.selected().expect("selection kept");
    assert_eq!(selected.id.as_deref(), Some("42"));
    assert_eq!(selected.display_name(), "Ada King");
    Ok(())
}
