//! Sign-in, sign-out and session persistence.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use wayfarer_core::Identity;
use wayfarer_integration_tests::TestApp;

// ============================================================================
// Sign-in
// ============================================================================

#[tokio::test]
async fn test_email_sign_in_persists_identity() {
    let app = TestApp::new();
    app.sign_in("a@b.com").await;

    let raw = app.persisted_identity().unwrap();
    assert_eq!(
        Identity::from_json(&raw).unwrap(),
        Identity {
            display_name: Some("a".to_string()),
            email: Some("a@b.com".to_string()),
            photo_url: None,
        }
    );

    let page = app.get("/app/map").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Signed in successfully!"));
}

#[tokio::test]
async fn test_email_sign_in_requires_both_fields() {
    let app = TestApp::new();
    app.post("/auth/email", &[("email", "a@b.com"), ("password", "")])
        .await
        .assert_redirect("/");

    assert!(app.persisted_identity().is_none());
    let entry = app.get("/").await;
    assert!(entry.body.contains("Please fill in all fields"));
}

#[tokio::test]
async fn test_phone_sign_in() {
    let app = TestApp::new();
    app.post("/auth/phone/code", &[("phone", "+15551234567")])
        .await
        .assert_redirect("/");
    assert!(app.get("/").await.body.contains("+15551234567"));

    app.post("/auth/phone/verify", &[("code", "123456")])
        .await
        .assert_redirect("/app/map");

    let identity = Identity::from_json(&app.persisted_identity().unwrap()).unwrap();
    assert_eq!(identity.display_name.as_deref(), Some("User-4567"));
}

#[tokio::test]
async fn test_phone_code_before_sending_is_rejected() {
    let app = TestApp::new();
    app.post("/auth/phone/verify", &[("code", "1")])
        .await
        .assert_redirect("/");
    assert!(app.get("/").await.body.contains("Please request an OTP first"));
}

#[tokio::test]
async fn test_social_sign_in() {
    let app = TestApp::new();
    app.post("/auth/social/google", &[])
        .await
        .assert_redirect("/app/map");

    let identity = Identity::from_json(&app.persisted_identity().unwrap()).unwrap();
    assert!(identity.photo_url.is_some());
    assert!(app.get("/app/map").await.body.contains("Signed in with Google!"));
}

#[tokio::test]
async fn test_unknown_social_provider() {
    let app = TestApp::new();
    let response = app.post("/auth/social/myspace", &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.persisted_identity().is_none());
}

// ============================================================================
// Guard
// ============================================================================

#[tokio::test]
async fn test_guard_redirects_anonymous_visitors() {
    let app = TestApp::new();
    for path in ["/app", "/app/map", "/app/chat", "/app/settings", "/app/map/scene"] {
        app.get(path).await.assert_redirect("/");
    }
}

#[tokio::test]
async fn test_app_index_redirects_to_map() {
    let app = TestApp::new();
    app.sign_in("a@b.com").await;
    app.get("/app").await.assert_redirect("/app/map");
}

#[tokio::test]
async fn test_entry_page_stays_public() {
    let app = TestApp::new();
    assert_eq!(app.get("/").await.status, StatusCode::OK);

    app.sign_in("a@b.com").await;
    let entry = app.get("/").await;
    assert_eq!(entry.status, StatusCode::OK);
    assert!(entry.body.contains("Signed in as a"));
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_slot_and_locks_app() {
    let app = TestApp::new();
    app.sign_in("a@b.com").await;
    let _ = app.get("/app/map").await;

    app.post("/auth/logout", &[]).await.assert_redirect("/");

    assert!(app.persisted_identity().is_none());
    assert!(!app.identity_path().exists());
    assert!(app.state().map().current().is_none());
    app.get("/app/map").await.assert_redirect("/");
    assert!(app.get("/").await.body.contains("Logged out successfully!"));
}

#[tokio::test]
async fn test_logout_when_signed_out() {
    let app = TestApp::new();
    app.post("/auth/logout", &[]).await.assert_redirect("/");
    assert!(app.persisted_identity().is_none());
}

// ============================================================================
// Persistence across restarts
// ============================================================================

#[tokio::test]
async fn test_session_survives_restart() {
    let app = TestApp::new();
    app.sign_in("a@b.com").await;

    let app = app.restart();
    assert_eq!(app.get("/app/map").await.status, StatusCode::OK);
    assert_eq!(
        app.state()
            .session()
            .current_identity()
            .and_then(|i| i.email.clone())
            .as_deref(),
        Some("a@b.com")
    );
}

#[tokio::test]
async fn test_logout_survives_restart() {
    let app = TestApp::new();
    app.sign_in("a@b.com").await;
    app.post("/auth/logout", &[]).await.assert_redirect("/");

    let app = app.restart();
    app.get("/app/map").await.assert_redirect("/");
}

#[tokio::test]
async fn test_malformed_slot_starts_signed_out() {
    let app = TestApp::new();
    std::fs::write(app.identity_path(), "{not json").unwrap();

    let app = app.restart();
    app.get("/app/map").await.assert_redirect("/");
    assert!(!app.identity_path().exists());
}

#[tokio::test]
async fn test_identity_with_extra_fields_is_accepted() {
    let app = TestApp::new();
    std::fs::write(
        app.identity_path(),
        r#"{"displayName":null,"email":"x@y.z","photoURL":null,"uid":"legacy"}"#,
    )
    .unwrap();

    let app = app.restart();
    assert_eq!(app.get("/app/settings").await.status, StatusCode::OK);
}
