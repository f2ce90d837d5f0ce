mod common;

use common::harness;
use secrecy::ExposeSecret;
use storewright_client::{PageObject, Screen, fixtures::LOCKED_OUT_ERROR};

#[tokio::test]
async fn standard_user_lands_on_inventory() {
    let h = harness().await;
    let scenario = h.anonymous().await;
    let creds = &h.fixtures.standard;

    let landed = scenario
        .login()
        .login(&creds.username, creds.password.expose_secret())
        .await
        .unwrap();
    assert_eq!(landed, Screen::Inventory);
    scenario.inventory().verify_page_loaded().await.unwrap();
    scenario.finish().await.unwrap();
}

#[tokio::test]
async fn locked_out_user_stays_on_login_with_error() {
    let h = harness().await;
    let scenario = h.anonymous().await;
    let login = scenario.login();
    let creds = &h.fixtures.locked_out;

    let landed = login
        .login(&creds.username, creds.password.expose_secret())
        .await
        .unwrap();
    assert_eq!(landed, Screen::Login);
    assert!(login.get_error_message().await.unwrap().contains(LOCKED_OUT_ERROR));
    assert!(login.is_login_form_visible().await.unwrap());
}

#[tokio::test]
async fn invalid_credentials_are_rejected_with_their_message() {
    let h = harness().await;
    let scenario = h.anonymous().await;
    let login = scenario.login();

    for case in &h.fixtures.invalid_logins {
        let landed = login
            .login(&case.username, case.password.expose_secret())
            .await
            .unwrap();
        assert_eq!(landed, Screen::Login, "case {:?}", case.expected_error);
        let message = login.get_error_message().await.unwrap();
        assert!(
            message.contains(case.expected_error),
            "expected {:?} in {:?}",
            case.expected_error,
            message
        );
        assert!(login.is_login_form_visible().await.unwrap());
    }
}

#[tokio::test]
async fn logout_returns_to_the_login_form() {
    let h = harness().await;
    let scenario = h.authenticated().await;

    assert_eq!(scenario.inventory().logout().await.unwrap(), Screen::Login);
    scenario.login().verify_page_loaded().await.unwrap();
    assert_eq!(scenario.current_screen().await.unwrap(), Screen::Login);
}
