//! HTTP API tests
//!
//! Public profile pages, avatar files and health checks.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::Value;
use tempfile::TempDir;

use biolink::api::{AppStartTime, asset_routes, health_routes, profile_routes};
use biolink::auth::StaticSecretAuthenticator;
use biolink::blob::LocalBlobStore;
use biolink::services::{LinkDraft, ProfileLinkStore};
use biolink::storage::MemoryStorage;

// =============================================================================
// Test Setup
// =============================================================================

async fn seeded_store(blob_dir: &TempDir) -> Arc<ProfileLinkStore> {
    let store = ProfileLinkStore::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(StaticSecretAuthenticator::new("secret").unwrap()),
        Arc::new(LocalBlobStore::new(blob_dir.path(), "/uploads")),
    );

    let mut profile = store.create_profile("alice").await.unwrap();
    store.record_share(&mut profile).await.unwrap();
    let draft = LinkDraft {
        icon: Some("/img/blog.png".to_string()),
        accent_color: Some("green".to_string()),
        ..LinkDraft::new("Blog", "https://alice.dev")
    };
    store.add_link(&mut profile, draft).await.unwrap();
    store
        .add_link(&mut profile, LinkDraft::new("GitHub", "https://github.com/alice"))
        .await
        .unwrap();

    Arc::new(store)
}

macro_rules! test_app {
    ($store:expr, $blob_dir:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($store.clone()))
                .app_data(web::Data::new(AppStartTime::now()))
                .app_data(web::Data::new(Arc::new(LocalBlobStore::new(
                    $blob_dir.path(),
                    "/uploads",
                ))))
                .service(health_routes())
                .service(profile_routes())
                .configure(|cfg| asset_routes(cfg, "/uploads")),
        )
        .await
    };
}

// =============================================================================
// Public profile
// =============================================================================

#[actix_rt::test]
async fn test_get_profile_returns_public_view() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;
    let app = test_app!(store, dir);

    let req = TestRequest::get().uri("/u/Alice").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "OK");

    let data = &body["data"];
    assert_eq!(data["handle"], "alice");
    assert_eq!(data["themePreference"], true);
    assert!(data.get("shareCount").is_none());
    assert!(data.get("unlocked").is_none());

    let links = data["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["title"], "Blog");
    assert_eq!(links[0]["iconGlyph"], "/img/blog.png");
    assert_eq!(links[0]["iconIsImage"], true);
    assert_eq!(links[0]["accentColor"], "green");
    assert_eq!(links[1]["iconGlyph"], "link");
    assert_eq!(links[1]["iconIsImage"], false);
}

#[actix_rt::test]
async fn test_get_unknown_profile_is_404_json() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;
    let app = test_app!(store, dir);

    let req = TestRequest::get().uri("/u/nobody").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "E002");
    assert!(body.get("data").is_none());
}

// =============================================================================
// Assets
// =============================================================================

#[actix_rt::test]
async fn test_uploaded_avatar_is_served() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;
    let mut profile = store.load("alice").await.unwrap();
    let url = store
        .upload_avatar(&mut profile, "me.png", b"\x89PNG fake")
        .await
        .unwrap();
    assert!(url.starts_with("/uploads/alice-"));
    let app = test_app!(store, dir);

    let req = TestRequest::get().uri(&url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"\x89PNG fake");

    let req = TestRequest::get().uri("/uploads/missing.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get().uri("/uploads/.hidden").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_default_avatar_is_served() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;
    let app = test_app!(store, dir);

    let profile = store.load("alice").await.unwrap();
    let req = TestRequest::get().uri(&profile.meta.avatar_ref).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/svg+xml");
}

// =============================================================================
// Health
// =============================================================================

#[actix_rt::test]
async fn test_health_reports_backend() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;
    let app = test_app!(store, dir);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"]["backend"], "memory");
    assert_eq!(body["data"]["storage"]["profiles_count"], 1);
}

#[actix_rt::test]
async fn test_liveness_is_no_content() {
    let dir = TempDir::new().unwrap();
    let store = seeded_store(&dir).await;
    let app = test_app!(store, dir);

    let req = TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
