use crate::gemini_harness::{
    API_KEY, app, evaluation_payload, json_reply, reply, structured_request, text_request,
};
use forensight::GatewayError;
use forensight::gateway::{RiskLevel, ScriptKind, VulnerabilityCategory};
use forensight::session::{HistoryEntry, HistoryKind};
use forensight::workflows::Outcome;
use wiremock::matchers::header;
use wiremock::{MockServer, ResponseTemplate};

#[tokio::test]
async fn generation_stores_script_and_records_history() {
    let server = MockServer::start().await;
    text_request("list running processes")
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(reply("Get-Process"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    assert!(app.script.update_prompt("list running processes").is_none());
    assert_eq!(app.script.generate().await, Outcome::Completed);

    let script = app.store.script();
    assert_eq!(script.generated_script, "Get-Process");
    assert_eq!(script.kind, ScriptKind::PowerShell);
    assert!(script.evaluation.is_none());

    let history = app.store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind(), HistoryKind::Script);
    match &history[0].entry {
        HistoryEntry::Script {
            prompt,
            generated_script,
            evaluation_result,
            ..
        } => {
            assert_eq!(prompt, "list running processes");
            assert_eq!(generated_script, "Get-Process");
            assert!(evaluation_result.is_none());
        }
        other => panic!("unexpected entry: {other:?}"),
    }
}

#[tokio::test]
async fn evaluation_adds_a_second_history_item() {
    let server = MockServer::start().await;
    text_request("list running processes")
        .respond_with(reply("Get-Process"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    structured_request()
        .respond_with(json_reply(&evaluation_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    app.script.update_prompt("list running processes");
    assert_eq!(app.script.generate().await, Outcome::Completed);
    assert_eq!(app.script.evaluate().await, Outcome::Completed);

    let evaluation = app.store.script().evaluation.expect("evaluation stored");
    assert_eq!(evaluation.vulnerabilities.len(), 1);
    assert_eq!(evaluation.vulnerabilities[0].risk_level, RiskLevel::High);
    assert_eq!(
        evaluation.vulnerabilities[0].category,
        VulnerabilityCategory::SensitiveDataExposure
    );
    assert_eq!(evaluation.improved_script, "Get-Process | Select-Object Name, Id");

    let history = app.store.history();
    assert_eq!(history.len(), 2);
    assert_ne!(history[0].id, history[1].id);
    assert!(matches!(
        &history[0].entry,
        HistoryEntry::Script {
            evaluation_result: Some(_),
            ..
        }
    ));
}

#[tokio::test]
async fn malformed_evaluation_sets_parse_banner_without_history() {
    let server = MockServer::start().await;
    text_request("list running processes")
        .respond_with(reply("Get-Process"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    structured_request()
        .respond_with(reply("{\"vulnerabilities\": [oops"))
        .mount(&server)
        .await;

    let app = app(&server);
    app.script.update_prompt("list running processes");
    app.script.generate().await;

    let expected = GatewayError::Parse(String::new()).user_message();
    assert_eq!(app.script.evaluate().await, Outcome::Failed(expected.clone()));
    assert_eq!(app.script.last_error(), Some(expected));
    assert!(app.store.script().evaluation.is_none());
    assert_eq!(app.store.history().len(), 1);

    app.script.dismiss_error();
    assert!(app.script.last_error().is_none());
}

#[tokio::test]
async fn rejected_key_surfaces_auth_message() {
    let server = MockServer::start().await;
    text_request("list running processes")
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let app = app(&server);
    app.script.update_prompt("list running processes");
    match app.script.generate().await {
        Outcome::Failed(message) => assert!(message.starts_with("Authentication failed")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(app.store.script().generated_script.is_empty());
    assert!(app.store.history().is_empty());
}

#[tokio::test]
async fn bash_kind_reaches_the_prompt() {
    let server = MockServer::start().await;
    text_request("Write a Bash script")
        .respond_with(reply("ps aux"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    app.script.set_script_kind(ScriptKind::Bash);
    app.script.update_prompt("list running processes");
    assert_eq!(app.script.generate().await, Outcome::Completed);
    assert_eq!(app.store.script().generated_script, "ps aux");
}
