mod common;

use std::path::{Path, PathBuf};

use axum::routing::get;
use axum::Router;
use http::{header, StatusCode};
use tempfile::TempDir;

use common::TestClient;
use observo::http_server::{file_href, MountPrefix};
use observo::{Config, Panel};

fn logs_fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let logs = temp.path().join("logs");
    std::fs::create_dir(&logs).unwrap();
    let app_log = logs.join("app.log");
    std::fs::write(&app_log, b"0123456789").unwrap();
    (temp, app_log)
}

fn href(path: &Path) -> String {
    file_href(&MountPrefix::default(), &path.display().to_string())
}

#[tokio::test]
async fn test_view_clear_delete_flow() {
    let (temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default());
    panel.watch_logs(temp.path().join("logs"));
    let mut client = TestClient::new(panel.router());

    let index = client.get("/").await;
    assert_eq!(index.status, StatusCode::OK);
    let body = index.text();
    assert!(body.contains("logs"));
    assert!(body.contains("app.log"));
    assert!(body.contains("10.00 B"));

    let view = client.get(&href(&app_log)).await;
    assert_eq!(view.status, StatusCode::OK);
    assert!(view.text().contains("0123456789"));

    let cleared = client.post(&format!("{}/clear", href(&app_log))).await;
    assert_eq!(cleared.status, StatusCode::SEE_OTHER);
    assert_eq!(cleared.location(), Some("/"));
    assert_eq!(std::fs::read(&app_log).unwrap().len(), 0);

    let index = client.get("/").await;
    let body = index.text();
    assert!(body.contains("0.00 B"));
    assert!(body.contains("File app.log cleared successfully"));

    // the notice is shown once
    let index = client.get("/").await;
    assert!(!index.text().contains("cleared successfully"));

    let view = client.get(&href(&app_log)).await;
    assert_eq!(view.status, StatusCode::OK);
    assert!(view.text().contains("0.00 B"));

    let deleted = client.post(&format!("{}/delete", href(&app_log))).await;
    assert_eq!(deleted.status, StatusCode::SEE_OTHER);
    assert!(!app_log.exists());

    let index = client.get("/").await;
    let body = index.text();
    assert!(body.contains("File app.log deleted"));
    assert!(body.contains("No files"));

    let view = client.get(&href(&app_log)).await;
    assert_eq!(view.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_method_answers_plain_text() {
    let (_temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    let deleted = client.delete(&href(&app_log)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.text(), "File deleted");
    assert!(!app_log.exists());

    let again = client.delete(&href(&app_log)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone.log");
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    assert_eq!(client.get(&href(&missing)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        client.post(&format!("{}/clear", href(&missing))).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get(&href(temp.path())).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_download_serves_attachment() {
    let (_temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    let response = client
        .get(&format!("{}?download=TRUE", href(&app_log)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"app.log\""
    );
    assert_eq!(response.headers.get(header::CONTENT_LENGTH).unwrap(), "10");
    assert_eq!(response.body, b"0123456789");
}

#[tokio::test]
async fn test_binary_file_redirects_with_notice() {
    let temp = TempDir::new().unwrap();
    let blob = temp.path().join("core.bin");
    std::fs::write(&blob, [0xff, 0xfe, 0x00, 0x80]).unwrap();
    let panel = Panel::new(Config::default());
    panel.watch_file(&blob, Some("core dump"));
    let mut client = TestClient::new(panel.router());

    let view = client.get(&href(&blob)).await;
    assert_eq!(view.status, StatusCode::SEE_OTHER);
    assert_eq!(view.location(), Some("/"));

    let index = client.get("/").await;
    let body = index.text();
    assert!(body.contains("Cannot display binary file content"));
    assert!(body.contains("core dump"));

    // raw bytes are still downloadable
    let download = client
        .get(&format!("{}?download=true", href(&blob)))
        .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.body, vec![0xff, 0xfe, 0x00, 0x80]);
}

#[tokio::test]
async fn test_open_panel_without_credentials() {
    let (_temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    let index = client.get("/").await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.text().contains("Nothing is being watched."));
    assert!(!index.text().contains("Logout"));
    assert_eq!(client.get(&href(&app_log)).await.status, StatusCode::OK);
    assert_eq!(client.get("/login").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_guard_redirects_to_login() {
    let (_temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default().with_password("hunter2"));
    let mut client = TestClient::new(panel.router());

    for uri in [
        "/".to_string(),
        href(&app_log),
        format!("{}?download=true", href(&app_log)),
    ] {
        let response = client.get(&uri).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(response.location(), Some("/login"));
    }

    let cleared = client.post(&format!("{}/clear", href(&app_log))).await;
    assert_eq!(cleared.status, StatusCode::SEE_OTHER);
    let deleted = client.delete(&href(&app_log)).await;
    assert_eq!(deleted.status, StatusCode::SEE_OTHER);
    assert_eq!(std::fs::read(&app_log).unwrap(), b"0123456789");

    // open routes stay reachable
    assert_eq!(client.get("/login").await.status, StatusCode::OK);
    assert_eq!(
        client.get("/static/observo.css").await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_password_only_login_accepts_any_username() {
    let panel = Panel::new(Config::default().with_password("hunter2"));
    let mut client = TestClient::new(panel.router());

    let page = client.get("/login").await;
    assert!(!page.text().contains("name=\"username\""));

    let rejected = client
        .post_form("/login", "username=whoever&password=wrong")
        .await;
    assert_eq!(rejected.status, StatusCode::OK);
    assert!(rejected.text().contains("Invalid credentials"));
    assert!(!client.has_cookie("osession"));

    let accepted = client
        .post_form("/login", "username=whoever&password=hunter2")
        .await;
    assert_eq!(accepted.status, StatusCode::SEE_OTHER);
    assert_eq!(accepted.location(), Some("/"));
    assert!(client.has_cookie("osession"));

    let index = client.get("/").await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.text().contains("Logout"));
}

#[tokio::test]
async fn test_username_and_password_must_both_match() {
    let panel = Panel::new(
        Config::default()
            .with_username("admin")
            .with_password("hunter2"),
    );
    let mut client = TestClient::new(panel.router());

    let page = client.get("/login").await;
    assert!(page.text().contains("name=\"username\""));

    let wrong_user = client
        .post_form("/login", "username=root&password=hunter2")
        .await;
    assert!(wrong_user.text().contains("Invalid credentials"));

    let missing_password = client.post_form("/login", "username=admin").await;
    assert!(missing_password.text().contains("Invalid credentials"));

    let accepted = client
        .post_form("/login", "username=admin&password=hunter2")
        .await;
    assert_eq!(accepted.status, StatusCode::SEE_OTHER);
    assert_eq!(client.get("/").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let panel = Panel::new(Config::default().with_password("hunter2"));
    let mut client = TestClient::new(panel.router());

    client.post_form("/login", "password=hunter2").await;
    assert_eq!(client.get("/").await.status, StatusCode::OK);

    let logout = client.get("/logout").await;
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(logout.location(), Some("/login"));
    assert!(!client.has_cookie("osession"));

    assert_eq!(client.get("/").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_password_change_signs_everyone_out() {
    let panel = Panel::new(Config::default().with_password("hunter2"));
    let mut client = TestClient::new(panel.router());

    client.post_form("/login", "password=hunter2").await;
    assert_eq!(client.get("/").await.status, StatusCode::OK);

    panel.set_password("correct horse");

    let index = client.get("/").await;
    assert_eq!(index.status, StatusCode::SEE_OTHER);
    assert_eq!(index.location(), Some("/login"));
}

#[tokio::test]
async fn test_forged_session_cookie_is_rejected() {
    let panel = Panel::new(Config::default().with_password("hunter2"));
    let mut client = TestClient::new(panel.router());

    client.set_raw_cookie("osession", "{\"logged_in\":true}");
    assert_eq!(client.get("/").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_pinned_secret_shares_sessions_between_panels() {
    let config = Config {
        password: Some("hunter2".to_string()),
        secret_key: Some("a pinned secret shared by both processes".to_string()),
        ..Config::default()
    };
    let first = Panel::new(config.clone());
    let second = Panel::new(config);

    let login = TestClient::new(first.router())
        .post_form("/login", "password=hunter2")
        .await;
    let value = login
        .set_cookies()
        .iter()
        .find_map(|c| c.split(';').next()?.strip_prefix("osession=").map(str::to_string))
        .unwrap();

    let mut other = TestClient::new(second.router());
    other.set_raw_cookie("osession", &value);
    assert_eq!(other.get("/").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_mounted_under_prefix() {
    let (temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default().with_password("hunter2"));
    panel.watch_logs(temp.path().join("logs"));

    let host = Router::new().route("/", get(|| async { "Hello" }));
    let mut client = TestClient::new(panel.mount(host, "/observo"));

    let hello = client.get("/").await;
    assert_eq!(hello.status, StatusCode::OK);
    assert_eq!(hello.text(), "Hello");

    let index = client.get("/observo").await;
    assert_eq!(index.status, StatusCode::SEE_OTHER);
    assert_eq!(index.location(), Some("/observo/login"));

    let login = client.post_form("/observo/login", "password=hunter2").await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
    assert_eq!(login.location(), Some("/observo"));
    assert!(login
        .set_cookies()
        .iter()
        .any(|c| c.starts_with("osession=") && c.contains("Path=/")));

    let index = client.get("/observo").await;
    assert_eq!(index.status, StatusCode::OK);
    assert!(index.text().contains("10.00 B"));

    let prefix = MountPrefix("/observo".to_string());
    let file_url = file_href(&prefix, &app_log.display().to_string());
    let cleared = client.post(&format!("{}/clear", file_url)).await;
    assert_eq!(cleared.status, StatusCode::SEE_OTHER);
    assert_eq!(cleared.location(), Some("/observo"));

    let missing = client.get("/observo/nowhere").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restricted_panel_refuses_unwatched_files() {
    let (temp, app_log) = logs_fixture();
    let outside = TempDir::new().unwrap();
    let stray = outside.path().join("stray.log");
    std::fs::write(&stray, b"secret").unwrap();

    let panel = Panel::new(Config::default().restrict_to_watched(true));
    panel.watch_logs(temp.path().join("logs"));
    let mut client = TestClient::new(panel.router());

    assert_eq!(client.get(&href(&app_log)).await.status, StatusCode::OK);
    assert_eq!(client.get(&href(&stray)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        client.delete(&href(&stray)).await.status,
        StatusCode::NOT_FOUND
    );
    assert!(stray.exists());
}

#[tokio::test]
async fn test_into_service_serves_requests() {
    use tower::ServiceExt;

    let panel = Panel::new(Config::default());
    let service = panel.into_service();
    let request = http::Request::builder()
        .uri("/static/observo.css")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = service.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    let response = client.get("/nowhere").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quoted_file_name_stays_out_of_script() {
    let temp = TempDir::new().unwrap();
    let logs = temp.path().join("logs");
    std::fs::create_dir(&logs).unwrap();
    std::fs::write(logs.join("x');fetch('evil');('.log"), b"boom").unwrap();

    let panel = Panel::new(Config::default());
    panel.watch_logs(&logs);
    let mut client = TestClient::new(panel.router());

    let body = client.get("/").await.text();
    assert!(body.contains("this.dataset.name"));
    assert!(body.contains("data-name=\"x&#x27;);fetch(&#x27;evil&#x27;);(&#x27;.log\""));
    assert!(!body.contains("confirm('Delete x"));
}

#[tokio::test]
async fn test_path_below_a_file_is_not_found() {
    let (_temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    let below = app_log.join("child");
    let view = client.get(&href(&below)).await;
    assert_eq!(view.status, StatusCode::NOT_FOUND);

    let cleared = client.post(&format!("{}/clear", href(&below))).await;
    assert_eq!(cleared.status, StatusCode::NOT_FOUND);

    let deleted = client.delete(&href(&below)).await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read(&app_log).unwrap(), b"0123456789");
}

#[tokio::test]
async fn test_download_keeps_non_ascii_name() {
    let temp = TempDir::new().unwrap();
    let journal = temp.path().join("journal-ü.log");
    std::fs::write(&journal, b"entry").unwrap();
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    let response = client
        .get(&format!("{}?download=true", href(&journal)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"journal-_.log\"; filename*=UTF-8''journal-%C3%BC.log"
    );
}

#[tokio::test]
async fn test_repeated_download_key_is_tolerated() {
    let (_temp, app_log) = logs_fixture();
    let panel = Panel::new(Config::default());
    let mut client = TestClient::new(panel.router());

    let download = client
        .get(&format!("{}?download=true&download=false", href(&app_log)))
        .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.body, b"0123456789");
    assert!(download.headers.contains_key(header::CONTENT_DISPOSITION));

    let view = client
        .get(&format!("{}?download=no&download=no", href(&app_log)))
        .await;
    assert_eq!(view.status, StatusCode::OK);
    assert!(!view.headers.contains_key(header::CONTENT_DISPOSITION));
    assert!(view.text().contains("0123456789"));
}
