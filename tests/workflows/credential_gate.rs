use crate::gemini_harness::{API_KEY, app_with, config_for, reply, text_request};
use forensight::session::MemoryHistoryStorage;
use forensight::workflows::{Outcome, Precondition};
use wiremock::MockServer;
use wiremock::matchers::header;

#[tokio::test]
async fn operations_wait_for_a_credential() {
    let server = MockServer::start().await;
    text_request("list running processes")
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(reply("Get-Process"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with(
        config_for(&server),
        None,
        Box::new(MemoryHistoryStorage::new()),
    );
    assert!(!app.store.has_credential());
    assert!(app.store.credential_prompt_open());

    app.script.update_prompt("list running processes");
    assert_eq!(
        app.script.generate().await,
        Outcome::Blocked(Precondition::MissingCredential)
    );
    assert!(app.script.last_error().is_none());

    // Blank submissions keep the prompt open.
    assert!(!app.store.submit_credential("   "));
    assert!(app.store.credential_prompt_open());

    assert!(app.store.submit_credential(&format!("  {API_KEY}  ")));
    assert!(!app.store.credential_prompt_open());
    assert_eq!(
        app.store.credential().map(|c| c.expose().to_string()),
        Some(API_KEY.to_string())
    );

    assert_eq!(app.script.generate().await, Outcome::Completed);
    assert_eq!(app.store.script().generated_script, "Get-Process");
}

#[tokio::test]
async fn prompt_cannot_be_dismissed_without_a_key() {
    let server = MockServer::start().await;
    let app = app_with(
        config_for(&server),
        None,
        Box::new(MemoryHistoryStorage::new()),
    );

    assert!(!app.store.dismiss_credential_prompt());
    assert!(app.store.credential_prompt_open());

    app.logs.update_logs("sshd[42]: Failed password for root");
    assert_eq!(
        app.logs.analyze().await,
        Outcome::Blocked(Precondition::MissingCredential)
    );
    assert!(app.store.logs().analysis.is_empty());
}
