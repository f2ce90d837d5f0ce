mod common;

use common::settings;
use secrecy::SecretString;
use storewright_client::{
    ClientError, Fixtures, PersistedIdentity, Screen, SessionBootstrapper, open_scenario,
};
use storewright_sim::SimBrowser;

#[tokio::test]
async fn identity_is_persisted_and_reusable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("auth-state.json");
    let fixtures = Fixtures::default();
    let bootstrap_browser = SimBrowser::new();

    let identity = SessionBootstrapper::new(settings(&dir), &path)
        .establish(
            &bootstrap_browser,
            &fixtures.standard.username,
            &fixtures.standard.password,
        )
        .await
        .unwrap();
    assert!(bootstrap_browser.is_closed());
    assert_eq!(bootstrap_browser.pages_opened(), 1);
    assert_eq!(identity.username(), "standard_user");
    assert_eq!(identity.state_path(), path.as_path());
    assert!(!identity.storage_state().is_empty());

    let loaded = PersistedIdentity::load(
        identity.username(),
        identity.password().clone(),
        &path,
    )
    .await
    .unwrap();
    assert_eq!(loaded.storage_state(), identity.storage_state());

    let scenario = open_scenario(&SimBrowser::new(), settings(&dir), Some(&loaded))
        .await
        .unwrap();
    assert_eq!(scenario.current_screen().await.unwrap(), Screen::Inventory);
}

#[tokio::test]
async fn rejected_login_fails_and_still_closes_the_browser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth-state.json");
    let fixtures = Fixtures::default();
    let browser = SimBrowser::new();

    let err = SessionBootstrapper::new(settings(&dir), &path)
        .establish(
            &browser,
            &fixtures.locked_out.username,
            &fixtures.locked_out.password,
        )
        .await
        .unwrap_err();
    match err {
        ClientError::AuthBootstrapFailure { username, reason } => {
            assert_eq!(username, "locked_out_user");
            assert!(reason.contains("locked out"), "{}", reason);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(browser.is_closed());
    assert!(!path.exists());

    let snapshots = std::fs::read_dir(dir.path().join("screenshots")).unwrap().count();
    assert_eq!(snapshots, 1);
}

#[tokio::test]
async fn wrong_password_is_a_bootstrap_failure() {
    let dir = tempfile::tempdir().unwrap();
    let browser = SimBrowser::new();

    let result = SessionBootstrapper::new(settings(&dir), dir.path().join("auth-state.json"))
        .establish(
            &browser,
            "standard_user",
            &SecretString::from("not-the-password".to_string()),
        )
        .await;
    assert!(matches!(result, Err(ClientError::AuthBootstrapFailure { .. })));
    assert!(browser.is_closed());
}

#[tokio::test]
async fn missing_artifact_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = PersistedIdentity::load(
        "standard_user",
        SecretString::from("secret_sauce".to_string()),
        dir.path().join("missing.json"),
    )
    .await;
    assert!(matches!(result, Err(ClientError::Io { .. })));
}

#[tokio::test]
async fn without_identity_scenarios_start_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = open_scenario(&SimBrowser::new(), settings(&dir), None)
        .await
        .unwrap();
    assert_eq!(scenario.current_screen().await.unwrap(), Screen::Login);
    scenario.finish().await.unwrap();
}
