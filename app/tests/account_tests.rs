//! Account flows: local validation before any platform round trip.

mod common;

use serde_json::json;

use plateshare_core::{Method, MockResponse};
use plateshare_app::account::AccountService;
use plateshare_app::AppError;

#[tokio::test]
async fn short_password_is_rejected_locally() {
    let (client, mock) = common::client();
    let err = AccountService::new(client)
        .update_password("tiny", "tiny")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn mismatched_confirmation_is_rejected_locally() {
    let (client, mock) = common::client();
    let err = AccountService::new(client)
        .update_password("password-one", "password-two")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn valid_password_update_requires_a_session() {
    let (client, mock) = common::client();
    let err = AccountService::new(client)
        .update_password("long-enough", "long-enough")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SignInRequired));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn signed_in_password_update_hits_the_auth_api() {
    let (client, mock) = common::client();
    common::sign_in(&client, &mock).await;
    mock.push_response(Method::Put, "/auth/v1/user", MockResponse::json(json!({})));

    AccountService::new(client)
        .update_password("long-enough", "long-enough")
        .await
        .unwrap();

    let request = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Put)
        .unwrap();
    assert_eq!(request.path, "/auth/v1/user");
}

#[tokio::test]
async fn reset_email_carries_the_redirect() {
    let (client, mock) = common::client();
    mock.push_response(Method::Post, "/auth/v1/recover", MockResponse::json(json!({})));

    AccountService::new(client)
        .send_password_reset("cook@example.com", "https://plateshare.test/reset-password")
        .await
        .unwrap();

    let request = &mock.requests()[0];
    assert_eq!(
        request.query_param("redirect_to"),
        Some("https://plateshare.test/reset-password")
    );
}

#[tokio::test]
async fn recovery_without_tokens_is_a_local_validation_error() {
    let (client, mock) = common::client();
    let err = AccountService::new(client)
        .adopt_recovery(None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn recovery_tokens_enable_a_password_update() {
    let (client, mock) = common::client();
    mock.push_response(
        Method::Get,
        "/auth/v1/user",
        MockResponse::json(json!({ "id": common::USER_ID, "email": "cook@example.com" })),
    );
    mock.push_response(Method::Put, "/auth/v1/user", MockResponse::json(json!({})));

    let service = AccountService::new(client);
    let session = service
        .adopt_recovery(Some("recovery-jwt"), Some("recovery-refresh"))
        .await
        .unwrap();
    assert_eq!(session.access_token, "recovery-jwt");

    service
        .update_password("fresh-password", "fresh-password")
        .await
        .unwrap();
}
