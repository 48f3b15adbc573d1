//! Existing files are served from disk; only misses reach the placeholder pipeline.

mod helpers;

use helpers::{seeded_store, setup_test_app_with, test_config, upload_path};
use std::fs;
use tempfile::TempDir;

fn uploads_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir_all(dir.path().join("2013/05")).unwrap();
    fs::write(dir.path().join("2013/05/photo-300x200.jpg"), b"real image bytes").unwrap();
    dir
}

#[tokio::test]
async fn test_existing_file_is_served() {
    let dir = uploads_dir();
    let mut config = test_config();
    config.placeholder.local_uploads_path = Some(dir.path().to_string_lossy().into_owned());
    let app = setup_test_app_with(config, seeded_store()).await;

    let response = app
        .client()
        .get(&upload_path("2013/05/photo-300x200.jpg"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), b"real image bytes");
    assert!(app.store.lookups().is_empty());
}

#[tokio::test]
async fn test_missing_file_falls_through_to_placeholder() {
    let dir = uploads_dir();
    let mut config = test_config();
    config.placeholder.local_uploads_path = Some(dir.path().to_string_lossy().into_owned());
    config.placeholder.placeholder_builder = "placekitten_color".to_string();
    let app = setup_test_app_with(config, seeded_store()).await;

    let response = app
        .client()
        .get(&upload_path("2013/05/photo-150x150.jpg"))
        .add_query_param("ver", "2")
        .await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "http://placekitten.com/150/150");
    assert_eq!(app.store.lookups(), vec!["2013/05/photo.jpg".to_string()]);
}

#[tokio::test]
async fn test_other_routes_still_work_with_local_uploads() {
    let dir = uploads_dir();
    let mut config = test_config();
    config.placeholder.local_uploads_path = Some(dir.path().to_string_lossy().into_owned());
    let app = setup_test_app_with(config, seeded_store()).await;

    assert_eq!(app.client().get("/health").await.status_code(), 200);
    assert_eq!(app.client().get("/favicon.ico").await.status_code(), 404);
}

#[tokio::test]
async fn test_directory_request_is_not_redirected_outside_upload_root() {
    let dir = uploads_dir();
    let mut config = test_config();
    config.placeholder.local_uploads_path = Some(dir.path().to_string_lossy().into_owned());
    let app = setup_test_app_with(config, seeded_store()).await;

    let response = app.client().get(&upload_path("2013/05")).await;

    assert_eq!(response.status_code(), 404);
    assert!(response.headers().get("location").is_none());
    assert_eq!(app.store.lookups(), vec!["2013/05".to_string()]);
}

#[tokio::test]
async fn test_post_to_missing_upload_reaches_placeholder() {
    let dir = uploads_dir();
    let mut config = test_config();
    config.placeholder.local_uploads_path = Some(dir.path().to_string_lossy().into_owned());
    let app = setup_test_app_with(config, seeded_store()).await;

    let response = app
        .client()
        .post(&upload_path("2013/05/photo-10x10.jpg"))
        .await;

    assert_eq!(response.status_code(), 302);
    assert!(response
        .header("location")
        .to_str()
        .unwrap()
        .starts_with("http://placehold.it/10x10/"));
}
