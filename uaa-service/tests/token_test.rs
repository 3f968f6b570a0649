mod common;

use axum::http::StatusCode;
use common::{basic_auth, spawn_app, DEMO_EMAIL, DEMO_PASSWORD};
use uuid::Uuid;

#[tokio::test]
async fn trusted_client_receives_full_scope_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(
            Some(&basic_auth("acme", "acmesecret")),
            "password",
            DEMO_EMAIL,
            DEMO_PASSWORD,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["scope"], "read write trust");

    let expires_in = body["expires_in"].as_i64().unwrap();
    assert!(expires_in > 0);
    assert!(expires_in < 86_400, "access token must expire within a day");

    assert_eq!(body["given_name"], "Toshiaki");
    assert_eq!(body["family_name"], "Maki");
    assert_eq!(body["display_name"], "Toshiaki Maki");

    // user_id is the member id in canonical UUID form.
    let user_id = body["user_id"].as_str().unwrap();
    let parsed = Uuid::parse_str(user_id).expect("user_id must be a UUID");
    assert_eq!(parsed, app.demo_member_id);

    assert!(body["access_token"].as_str().unwrap().contains('.'));
    assert!(body["refresh_token"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn guest_client_receives_read_only_short_lived_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(
            Some(&basic_auth("guest", "guest")),
            "password",
            DEMO_EMAIL,
            DEMO_PASSWORD,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scope"], "read");

    let expires_in = body["expires_in"].as_i64().unwrap();
    assert!(expires_in > 0);
    assert!(expires_in < 3_600, "guest tokens must expire within an hour");
}

#[tokio::test]
async fn unregistered_client_is_refused_even_with_valid_credentials() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(
            Some(&basic_auth("3rd", "3rd")),
            "password",
            DEMO_EMAIL,
            DEMO_PASSWORD,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_client");
    assert!(body.get("access_token").is_none());
}

#[tokio::test]
async fn unknown_client_is_refused() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(
            Some(&basic_auth("nobody", "whatever")),
            "password",
            DEMO_EMAIL,
            DEMO_PASSWORD,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_client");
}

#[tokio::test]
async fn wrong_client_secret_is_refused() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(
            Some(&basic_auth("acme", "not-the-secret")),
            "password",
            DEMO_EMAIL,
            DEMO_PASSWORD,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_client");
}

#[tokio::test]
async fn missing_basic_auth_is_an_unauthenticated_client() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(None, "password", DEMO_EMAIL, DEMO_PASSWORD)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_client");
}

#[tokio::test]
async fn wrong_member_password_is_a_bad_grant() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(
            Some(&basic_auth("acme", "acmesecret")),
            "password",
            DEMO_EMAIL,
            "wrong-password",
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_grant");
}

#[tokio::test]
async fn unknown_member_is_indistinguishable_from_wrong_password() {
    let app = spawn_app().await;
    let basic = basic_auth("acme", "acmesecret");

    let (unknown_status, unknown_body) = app
        .post_token(Some(&basic), "password", "ghost@example.com", "demo")
        .await;
    let (wrong_status, wrong_body) = app
        .post_token(Some(&basic), "password", DEMO_EMAIL, "wrong-password")
        .await;

    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(
        unknown_body, wrong_body,
        "error bodies must not reveal whether the account exists"
    );
}

#[tokio::test]
async fn unsupported_grant_type_is_refused() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token(
            Some(&basic_auth("acme", "acmesecret")),
            "client_credentials",
            DEMO_EMAIL,
            DEMO_PASSWORD,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_grant");
}

#[tokio::test]
async fn form_encoded_grant_parameters_are_accepted() {
    let app = spawn_app().await;

    let (status, body) = app
        .post_token_form(
            &basic_auth("acme", "acmesecret"),
            "password",
            DEMO_EMAIL,
            DEMO_PASSWORD,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scope"], "read write trust");
}

#[tokio::test]
async fn repeated_grants_issue_distinct_tokens() {
    let app = spawn_app().await;

    let first = app.access_token("acme", "acmesecret").await;
    let second = app.access_token("acme", "acmesecret").await;

    assert_ne!(first, second, "each grant must carry a fresh token id");
}
