//! Map interactions: markers, details panel, outbound links and geolocation.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use wayfarer_integration_tests::TestApp;

async fn signed_in(vars: &[(&str, &str)]) -> TestApp {
    let app = TestApp::with_env(vars);
    app.sign_in("a@b.com").await;
    app
}

// ============================================================================
// Markers and selection
// ============================================================================

#[tokio::test]
async fn test_map_shows_every_marker() {
    let app = signed_in(&[]).await;
    let page = app.get("/app/map").await;
    assert_eq!(page.status, StatusCode::OK);
    for title in ["New York", "London", "Paris", "Tokyo", "San Francisco"] {
        assert!(page.body.contains(title), "missing {title}");
    }

    let scene = app.scene().await;
    assert_eq!(scene["pins"].as_array().unwrap().len(), 5);
    assert_eq!(scene["zoom"], 3);
    assert!(scene["tiles"].is_object());
}

#[tokio::test]
async fn test_marker_click_opens_details() {
    let app = signed_in(&[]).await;
    let pin = app.pin_for("London").await;

    app.post(&format!("/app/map/pins/{pin}/click"), &[])
        .await
        .assert_redirect("/app/map");

    let page = app.get("/app/map").await;
    assert!(page.body.contains("Westminster, London, UK"));
    assert!(page.body.contains("Navigate"));
    assert!(page.body.contains("WhatsApp"));
}

#[tokio::test]
async fn test_unknown_pin_is_not_found() {
    let app = signed_in(&[]).await;
    let _ = app.get("/app/map").await;
    let response = app.post("/app/map/pins/9999/click", &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_close_selection() {
    let app = signed_in(&[]).await;
    let pin = app.pin_for("Paris").await;
    let _ = app.post(&format!("/app/map/pins/{pin}/click"), &[]).await;

    app.post("/app/map/selection/close", &[])
        .await
        .assert_redirect("/app/map");
    assert!(!app.get("/app/map").await.body.contains("Champ de Mars"));
}

// ============================================================================
// Outbound links
// ============================================================================

#[tokio::test]
async fn test_navigate_keeps_selection() {
    let app = signed_in(&[]).await;
    let pin = app.pin_for("London").await;
    let _ = app.post(&format!("/app/map/pins/{pin}/click"), &[]).await;

    app.post("/app/map/selection/navigate", &[])
        .await
        .assert_redirect("https://www.google.com/maps/dir/?api=1&destination=51.5074,-0.1278");

    let page = app.get("/app/map").await;
    assert!(page.body.contains("Opening navigation..."));
    assert!(page.body.contains("Westminster, London, UK"));
}

#[tokio::test]
async fn test_share_link() {
    let app = signed_in(&[]).await;
    let pin = app.pin_for("Tokyo").await;
    let _ = app.post(&format!("/app/map/pins/{pin}/click"), &[]).await;

    let response = app.post("/app/map/selection/share", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let location = response.location.unwrap();
    assert!(location.starts_with("https://wa.me/?text="));
    assert!(location.contains("Tokyo"));
    assert!(app.get("/app/map").await.body.contains("Opening WhatsApp..."));
}

#[tokio::test]
async fn test_navigate_without_selection_stays_on_map() {
    let app = signed_in(&[]).await;
    let _ = app.get("/app/map").await;
    app.post("/app/map/selection/navigate", &[])
        .await
        .assert_redirect("/app/map");
}

// ============================================================================
// Geolocation
// ============================================================================

#[tokio::test]
async fn test_location_not_supported() {
    let app = signed_in(&[]).await;
    let pin = app.pin_for("London").await;
    let _ = app.post(&format!("/app/map/pins/{pin}/click"), &[]).await;

    app.post("/app/map/location", &[])
        .await
        .assert_redirect("/app/map");

    assert!(app.state().session().is_authenticated());
    let page = app.get("/app/map").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Geolocation is not supported on this device"));
    assert!(page.body.contains("Westminster, London, UK"));
    assert!(!page.body.contains("You are here"));
}

#[tokio::test]
async fn test_location_found() {
    let app = signed_in(&[("WAYFARER_DEVICE_LOCATION", "52.52,13.405")]).await;
    app.post("/app/map/location", &[])
        .await
        .assert_redirect("/app/map");

    let page = app.get("/app/map").await;
    assert!(page.body.contains("Location found!"));
    assert!(page.body.contains("52.520000, 13.405000"));

    let scene = app.scene().await;
    assert_eq!(scene["flight"]["zoom"], 15);
    let current = scene["pins"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|pin| pin["kind"] == "current_location")
        .count();
    assert_eq!(current, 1);
}

#[tokio::test]
async fn test_location_requested_twice_keeps_one_pin() {
    let app = signed_in(&[("WAYFARER_DEVICE_LOCATION", "52.52,13.405")]).await;
    let _ = app.post("/app/map/location", &[]).await;
    let _ = app.post("/app/map/location", &[]).await;

    let scene = app.scene().await;
    let pins = scene["pins"].as_array().unwrap();
    assert_eq!(pins.len(), 6);
}

#[tokio::test]
async fn test_location_denied() {
    let app = signed_in(&[("WAYFARER_DEVICE_LOCATION", "denied")]).await;
    let _ = app.post("/app/map/location", &[]).await;

    let page = app.get("/app/map").await;
    assert!(page.body.contains("get your location"));
    assert!(!page.body.contains("Location found!"));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_logout_unmounts_map() {
    let app = signed_in(&[]).await;
    assert!(app.scene().await.is_object());

    app.post("/auth/logout", &[]).await.assert_redirect("/");
    assert!(app.state().scene().snapshot().is_none());
}
