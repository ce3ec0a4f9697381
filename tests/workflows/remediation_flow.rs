use crate::gemini_harness::{
    API_KEY, app, app_with, config_for, eventually, json_reply, plan_payload, reply,
    structured_request, text_request,
};
use forensight::gateway::{Priority, RemediationCategory};
use forensight::session::{MemoryHistoryStorage, View};
use forensight::workflows::Outcome;
use wiremock::MockServer;
use wiremock::matchers::body_string_contains;

#[tokio::test]
async fn empty_session_asks_for_platform_hardening() {
    let server = MockServer::start().await;
    structured_request()
        .and(body_string_contains("general system hardening tips for a Windows environment"))
        .respond_with(json_reply(&plan_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    assert!(!app.remediation.has_context());
    assert_eq!(app.remediation.refresh().await, Outcome::Completed);

    let plan = app.store.remediation_plan();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].category, RemediationCategory::NetworkSecurity);
    assert_eq!(plan[0].priority, Priority::High);
    assert!(app.store.history().is_empty());
}

#[tokio::test]
async fn analysis_report_feeds_the_plan() {
    let server = MockServer::start().await;
    text_request("Failed password")
        .respond_with(reply("Brute force from 10.0.0.5"))
        .mount(&server)
        .await;
    structured_request()
        .and(body_string_contains("## Log Analysis Report"))
        .and(body_string_contains("Brute force from 10.0.0.5"))
        .respond_with(json_reply(&plan_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server);
    app.logs.update_logs("sshd[811]: Failed password for root from 10.0.0.5");
    assert_eq!(app.logs.analyze().await, Outcome::Completed);
    assert!(app.remediation.has_context());
    assert_eq!(app.remediation.refresh().await, Outcome::Completed);
    assert_eq!(app.store.remediation_plan().len(), 1);
}

#[tokio::test]
async fn active_remediation_view_follows_upstream_changes() {
    let server = MockServer::start().await;
    structured_request()
        .respond_with(json_reply(&plan_payload()))
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.remediation.auto_refresh = true;
    let app = app_with(config, Some(API_KEY), Box::new(MemoryHistoryStorage::new()));

    app.set_view(View::Remediation);
    assert!(app.is_reactive());
    assert!(eventually(|| !app.store.remediation_plan().is_empty()).await);

    let before = server.received_requests().await.unwrap_or_default().len();
    app.logs.update_logs("sshd[811]: Failed password for root from 10.0.0.5");
    assert!(
        wait_for_requests(&server, before + 1).await,
        "a log edit should trigger another plan request"
    );

    app.set_view(View::Script);
    assert!(!app.is_reactive());
}

async fn wait_for_requests(server: &MockServer, count: usize) -> bool {
    for _ in 0..100 {
        let seen = server.received_requests().await.unwrap_or_default().len();
        if seen >= count {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    false
}
