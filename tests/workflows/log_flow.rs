use crate::gemini_harness::{app, reply, text_request};
use forensight::security::MAX_LOG_LENGTH;
use forensight::session::{HistoryEntry, HistoryKind, View};
use forensight::workflows::Outcome;
use wiremock::MockServer;

const AUTH_LOG: &str = "\
Oct 18 03:12:01 host sshd[811]: Failed password for root from 10.0.0.5 port 52211 ssh2
Oct 18 03:12:04 host sshd[811]: Failed password for root from 10.0.0.5 port 52211 ssh2
Oct 18 03:12:09 host sshd[811]: Accepted password for root from 10.0.0.5 port 52211 ssh2";

#[tokio::test]
async fn analysis_with_focus_term_records_history() {
    let server = MockServer::start().await;
    text_request("10.0.0.5")
        .and(wiremock::matchers::body_string_contains("particular attention"))
        .respond_with(reply("## Summary\n- Brute force followed by a successful root login"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    assert!(app.logs.update_logs(AUTH_LOG).is_none());
    app.logs.set_focus_term("10.0.0.5");
    assert_eq!(app.logs.analyze().await, Outcome::Completed);

    let slice = app.store.logs();
    assert!(slice.analysis.starts_with("## Summary"));

    let history = app.store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind(), HistoryKind::Log);
    match &history[0].entry {
        HistoryEntry::Log {
            logs, focus_term, ..
        } => {
            assert_eq!(logs, AUTH_LOG);
            assert_eq!(focus_term, "10.0.0.5");
        }
        other => panic!("unexpected entry: {other:?}"),
    }
}

#[tokio::test]
async fn restoring_an_analysis_replaces_the_script_slice() {
    let server = MockServer::start().await;
    text_request("Failed password")
        .respond_with(reply("## Summary\n- Brute force"))
        .mount(&server)
        .await;

    let app = app(&server);
    app.logs.update_logs(AUTH_LOG);
    app.logs.analyze().await;
    let saved = app.store.history()[0].clone();

    app.script.update_prompt("collect browser history");
    app.logs.update_logs("");
    app.store.set_active_view(View::Script);

    app.store.load_from_history(&saved);
    assert_eq!(app.store.active_view(), View::Logs);
    assert_eq!(app.store.logs().logs, AUTH_LOG);
    assert_eq!(app.store.logs().analysis, "## Summary\n- Brute force");
    assert!(app.store.script().prompt.is_empty());
    assert!(app.store.script().generated_script.is_empty());
}

#[tokio::test]
async fn oversized_logs_are_truncated_but_still_submittable() {
    let server = MockServer::start().await;
    text_request("xxxx")
        .respond_with(reply("Nothing notable."))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    let error = app.logs.update_logs(&"x".repeat(MAX_LOG_LENGTH + 10));
    assert!(error.is_some());
    assert_eq!(app.store.logs().logs.chars().count(), MAX_LOG_LENGTH);
    assert_eq!(app.logs.validation_error(), error);

    assert_eq!(app.logs.analyze().await, Outcome::Completed);
}
