mod common;

use std::sync::Arc;

use auth::FixedClock;
use auth::TokenCodec;
use chrono::Duration;
use chrono::Utc;
use common::StaticMovieChart;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use user_service::domain::movie::errors::ScraperError;

#[tokio::test]
async fn test_create_user_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "username": "nicola",
            "email": "nicola@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_user_without_email() {
    let app = TestApp::spawn().await;

    let body = app.create_user("nicola", None, "pass_word!").await;
    assert!(body["data"]["email"].is_null());
}

#[tokio::test]
async fn test_create_user_duplicate_username() {
    let app = TestApp::spawn().await;

    app.create_user("nicola", Some("nicola@example.com"), "pass_word!")
        .await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "username": "nicola",
            "email": "other@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(response.headers()["x-error-code"], "USERNAME_TAKEN");

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["code"], "USERNAME_TAKEN");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let app = TestApp::spawn().await;

    app.create_user("nicola", Some("nicola@example.com"), "pass_word!")
        .await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "username": "other",
            "email": "nicola@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(response.headers()["x-error-code"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn test_create_user_reserved_username() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/users")
        .json(&json!({
            "username": "admin",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()["x-error-code"], "INVALID_USERNAME");
}

#[tokio::test]
async fn test_create_user_invalid_fields() {
    let app = TestApp::spawn().await;

    let cases = [
        (json!({"username": "ab", "password": "x"}), "INVALID_USERNAME"),
        (
            json!({"username": "nicola", "email": "nope", "password": "x"}),
            "INVALID_EMAIL",
        ),
        (json!({"username": "nicola", "password": ""}), "INVALID_PASSWORD"),
    ];

    for (body, code) in cases {
        let response = app
            .post("/api/users")
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()["x-error-code"], code);
    }
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", None, "pass_word!").await;

    let tokens = app.login("nicola", "pass_word!").await;

    assert_eq!(tokens["token_type"], "bearer");
    let access = app
        .codec
        .decode_and_verify(tokens["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(access.sub, "nicola");
    assert_eq!(access.kind, auth::TokenKind::Access);

    let refresh = app
        .codec
        .decode_and_verify(tokens["refresh_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(refresh.kind, auth::TokenKind::Refresh);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", None, "pass_word!").await;

    let mut bodies = Vec::new();
    for (username, password) in [("nicola", "wrong"), ("ghost", "pass_word!")] {
        let response = app
            .post("/api/auth/login")
            .json(&json!({"username": username, "password": password}))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["x-error-code"], "INVALID_CREDENTIALS");
        bodies.push(
            response
                .json::<serde_json::Value>()
                .await
                .expect("Failed to parse response"),
        );
    }

    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn test_refresh_token() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", None, "pass_word!").await;
    let tokens = app.login("nicola", "pass_word!").await;

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({"refresh_token": tokens["refresh_token"]}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["token_type"], "bearer");

    let access_token = body["data"]["access_token"].as_str().unwrap();
    let claims = app.codec.decode_and_verify(access_token).unwrap();
    assert_eq!(claims.sub, "nicola");

    let profile = app
        .get_authenticated("/api/profile", access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(profile.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_with_access_token() {
    let app = TestApp::spawn().await;
    let (access_token, _) = app.create_and_login("nicola", "pass_word!").await;

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({"refresh_token": access_token}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-error-code"], "WRONG_TOKEN_KIND");
}

#[tokio::test]
async fn test_refresh_with_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({"refresh_token": "not.a.token"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-error-code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_get_profile() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", Some("nicola@example.com"), "pass_word!")
        .await;
    let tokens = app.login("nicola", "pass_word!").await;

    let response = app
        .get_authenticated("/api/profile", tokens["access_token"].as_str().unwrap())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
}

#[tokio::test]
async fn test_profile_rejects_refresh_token() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", None, "pass_word!").await;
    let tokens = app.login("nicola", "pass_word!").await;

    let response = app
        .get_authenticated("/api/profile", tokens["refresh_token"].as_str().unwrap())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-error-code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_profile_rejects_expired_token() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", None, "pass_word!").await;

    let issued_at = Utc::now() - Duration::hours(2);
    let stale_codec = TokenCodec::with_clock(&app.auth_config, Arc::new(FixedClock(issued_at)));
    let expired = stale_codec.issue_access_token("nicola").unwrap();

    let response = app
        .get_authenticated("/api/profile", &expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_of_deleted_user() {
    let app = TestApp::spawn().await;
    let (access_token, user_id) = app.create_and_login("nicola", "pass_word!").await;

    let response = app
        .delete_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated("/api/profile", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::spawn().await;

    for path in ["/api/users", "/api/profile"] {
        let response = app
            .get(path)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()["x-error-code"], "UNAUTHORIZED");
    }

    let response = app
        .get("/api/users")
        .header("Authorization", "Basic bmljb2xhOnBhc3M=")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_and_list_users() {
    let app = TestApp::spawn().await;
    let (access_token, user_id) = app.create_and_login("nicola", "pass_word!").await;
    app.create_user("second", None, "pass_word!").await;

    let response = app
        .get_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["id"], user_id.as_str());

    let response = app
        .get_authenticated("/api/users", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_user_errors() {
    let app = TestApp::spawn().await;
    let (access_token, _) = app.create_and_login("nicola", "pass_word!").await;

    let response = app
        .get_authenticated("/api/users/not-a-uuid", &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-error-code"], "INVALID_USER_ID");

    let response = app
        .get_authenticated(
            &format!("/api/users/{}", uuid::Uuid::new_v4()),
            &access_token,
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-error-code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_patch_user_merges_fields() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", Some("nicola@example.com"), "pass_word!")
        .await;
    let tokens = app.login("nicola", "pass_word!").await;
    let access_token = tokens["access_token"].as_str().unwrap();

    let profile: serde_json::Value = app
        .get_authenticated("/api/profile", access_token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let user_id = profile["data"]["id"].as_str().unwrap();

    let response = app
        .patch_authenticated(&format!("/api/users/{}", user_id), access_token)
        .json(&json!({"password": "new_pass_word!"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");

    // The new password works, the old one no longer does.
    app.login("nicola", "new_pass_word!").await;
    let response = app
        .post("/api/auth/login")
        .json(&json!({"username": "nicola", "password": "pass_word!"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_patch_user_null_email_clears_it() {
    let app = TestApp::spawn().await;
    let created = app
        .create_user("nicola", Some("nicola@example.com"), "pass_word!")
        .await;
    let user_id = created["data"]["id"].as_str().unwrap();
    let tokens = app.login("nicola", "pass_word!").await;
    let access_token = tokens["access_token"].as_str().unwrap();

    // Leaving the field out keeps the email.
    let response = app
        .patch_authenticated(&format!("/api/users/{}", user_id), access_token)
        .json(&json!({"username": "nicola_b"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], "nicola@example.com");

    let response = app
        .patch_authenticated(&format!("/api/users/{}", user_id), access_token)
        .json(&json!({"email": null}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "nicola_b");
    assert!(body["data"]["email"].is_null());

    // The address is free again.
    app.create_user("other", Some("nicola@example.com"), "pass_word!")
        .await;
}

#[tokio::test]
async fn test_patch_user_email_taken() {
    let app = TestApp::spawn().await;
    app.create_user("other", Some("taken@example.com"), "pass_word!")
        .await;
    let (access_token, user_id) = app.create_and_login("nicola", "pass_word!").await;

    let response = app
        .patch_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .json(&json!({"email": "taken@example.com"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(response.headers()["x-error-code"], "EMAIL_TAKEN");
}

#[tokio::test]
async fn test_put_user_replaces_all_fields() {
    let app = TestApp::spawn().await;
    app.create_user("nicola", Some("nicola@example.com"), "pass_word!")
        .await;
    let tokens = app.login("nicola", "pass_word!").await;
    let access_token = tokens["access_token"].as_str().unwrap().to_string();

    let profile: serde_json::Value = app
        .get_authenticated("/api/profile", &access_token)
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let user_id = profile["data"]["id"].as_str().unwrap();

    let response = app
        .put_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .json(&json!({"username": "renamed", "password": "another_pass"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "renamed");
    assert!(body["data"]["email"].is_null());

    app.login("renamed", "another_pass").await;
}

#[tokio::test]
async fn test_put_user_reserved_username() {
    let app = TestApp::spawn().await;
    let (access_token, user_id) = app.create_and_login("nicola", "pass_word!").await;

    let response = app
        .put_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .json(&json!({"username": "Admin", "password": "pass_word!"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()["x-error-code"], "INVALID_USERNAME");
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::spawn().await;
    let (access_token, _) = app.create_and_login("nicola", "pass_word!").await;
    let other = app.create_user("other", None, "pass_word!").await;
    let other_id = other["data"]["id"].as_str().unwrap();

    let response = app
        .delete_authenticated(&format!("/api/users/{}", other_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .delete_authenticated(&format!("/api/users/{}", other_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_top_movies() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/imdb/top250")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["results"][0]["rank"], 1);
    assert_eq!(body["data"]["results"][1]["title"], "The Godfather");
    assert!(body["data"]["results"][1]["rating_count"].is_null());
}

#[tokio::test]
async fn test_top_movies_scrape_failure() {
    let app = TestApp::spawn_with_chart(StaticMovieChart::failing(
        ScraperError::NextDataNotFound,
    ))
    .await;

    let response = app
        .get("/api/imdb/top250")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.headers()["x-error-code"], "SCRAPE_FAILED");
}
