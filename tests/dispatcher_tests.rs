//! End-to-end tests of the admin HTTP surface
//!
//! These tests verify the complete flow from form submission to response:
//! authentication, nonce checks, validation redirects, CSV downloads and
//! bulk delete outcomes.

use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::TestServer;
use bulk_admin::prelude::*;
use chrono::TimeZone;
use serde_json::Value;

const ADMIN_TOKEN: &str = "admin-token";
const EDITOR_TOKEN: &str = "editor-token";
const ADMIN_ID: u64 = 1;

// =============================================================================
// Test Setup
// =============================================================================

fn test_config() -> AdminConfig {
    AdminConfig::from_yaml_str(&format!(
        r#"
export:
  delimiter: ","
  charset: UTF-8
principals:
  - token: {ADMIN_TOKEN}
    id: {ADMIN_ID}
    admin: true
  - token: {EDITOR_TOKEN}
    id: 2
    roles: [editor]
"#
    ))
    .expect("test config should parse")
}

fn at(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 12, 0, 0).unwrap()
}

struct TestApp {
    server: TestServer,
    posts: InMemoryRecordStore<ContentItem>,
    accounts: InMemoryRecordStore<Account>,
}

fn create_test_app() -> TestApp {
    let posts = InMemoryRecordStore::new();
    for month in 1..=5u32 {
        posts
            .insert(ContentItem::new(
                month as u64,
                "post",
                format!("Post {month}"),
                at(month, 15),
            ))
            .unwrap();
    }
    posts
        .insert(ContentItem::new(20, "page", "About", at(3, 1)))
        .unwrap();

    let accounts = InMemoryRecordStore::new();
    accounts
        .insert(Account::new(ADMIN_ID, "admin", "subscriber", at(1, 1)))
        .unwrap();
    accounts
        .insert(Account::new(2, "editor", "editor", at(1, 2)))
        .unwrap();
    for id in 3..=5u64 {
        accounts
            .insert(Account::new(id, format!("reader{id}"), "subscriber", at(2, id as u32)))
            .unwrap();
    }

    let app = AdminServerBuilder::new()
        .with_config(test_config())
        .with_content_store(posts.clone())
        .with_account_store(accounts.clone())
        .build()
        .expect("app should build");

    TestApp {
        server: TestServer::new(app),
        posts,
        accounts,
    }
}

fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

async fn nonce_for(server: &TestServer, action: &str) -> String {
    let (name, value) = bearer(ADMIN_TOKEN);
    let response = server
        .get(&format!("/admin/nonce/{action}"))
        .add_header(name, value)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["nonce"].as_str().expect("nonce in body").to_string()
}

fn location(response: &axum_test::TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .expect("ascii location")
        .to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_test_app();

    for path in ["/health", "/healthz"] {
        let response = app.server.get(path).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

// =============================================================================
// Authorization and nonces
// =============================================================================

#[tokio::test]
async fn test_anonymous_request_is_unauthorized() {
    let app = create_test_app();

    let response = app
        .server
        .post("/admin/posts/export")
        .form(&[("subtype", "post"), ("date_option", "all")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let app = create_test_app();
    let (name, value) = bearer(EDITOR_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[("subtype", "post"), ("delete_all", "on")])
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.posts.len().unwrap(), 6);
}

#[tokio::test]
async fn test_bad_nonce_is_rejected() {
    let app = create_test_app();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[("subtype", "post"), ("delete_all", "on"), ("nonce", "forged")])
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_NONCE");
    assert_eq!(body["message"], "Security check failed.");
    assert_eq!(app.posts.len().unwrap(), 6);
}

#[tokio::test]
async fn test_nonce_is_bound_to_action() {
    let app = create_test_app();
    let export_nonce = nonce_for(&app.server, "export_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("delete_all", "on"),
            ("nonce", export_nonce.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_nonce_action_is_bad_request() {
    let app = create_test_app();
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .get("/admin/nonce/drop_everything")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_posts_in_range_downloads_csv() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "export_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/export")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("date_option", "range"),
            ("date_start", "2024-02-01"),
            ("date_end", "2024-03-31"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/csv; charset=UTF-8");
    assert_eq!(response.header("pragma"), "no-cache");
    assert_eq!(response.header("expires"), "0");

    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"post_posts_export_"));
    assert!(disposition.ends_with(".csv\""));

    let body = response.text();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ID,Title,"));
    assert!(lines[1].starts_with("2,Post 2,"));
    assert!(lines[2].starts_with("3,Post 3,"));
}

#[tokio::test]
async fn test_export_users_by_role() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "export_users").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/users/export")
        .add_header(name, value)
        .form(&[
            ("subtype", "subscriber"),
            ("date_option", "all"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status_ok();
    let body = response.text();
    let ids: Vec<&str> = body
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "3", "4", "5"]);
}

#[tokio::test]
async fn test_export_with_no_matches_redirects_with_message() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "export_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/export")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("date_option", "single"),
            ("date_single", "2023-12-31"),
            ("date_condition", "before"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/admin/manage-posts?message=No+posts+found+for+the+selected+type+and+date+filters+to+export."
    );
}

#[tokio::test]
async fn test_invalid_date_redirects_without_exporting() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "export_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/export")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("date_option", "range"),
            ("date_start", "2024-13-45"),
            ("date_end", "2024-03-31"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/admin/manage-posts?message="));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_posts_in_range() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "delete_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("date_option", "range"),
            ("date_start", "2024-02-01"),
            ("date_end", "2024-03-31"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/admin/manage-posts?message=2+posts+deleted+successfully."
    );
    assert!(app.posts.get(2).unwrap().is_none());
    assert!(app.posts.get(3).unwrap().is_none());
    assert!(app.posts.get(20).unwrap().is_some(), "pages are untouched");
    assert_eq!(app.posts.len().unwrap(), 4);
}

#[tokio::test]
async fn test_delete_single_post_uses_singular_message() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "delete_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[
            ("subtype", "page"),
            ("date_option", "single"),
            ("date_single", "2024-02-28"),
            ("date_condition", "after"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    assert_eq!(
        location(&response),
        "/admin/manage-posts?message=1+post+deleted+successfully."
    );
}

#[tokio::test]
async fn test_delete_without_filter_or_flag_deletes_nothing() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "delete_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("date_option", "all"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    assert_eq!(
        location(&response),
        "/admin/manage-posts?message=0+posts+deleted+successfully."
    );
    assert_eq!(app.posts.len().unwrap(), 6);
}

#[tokio::test]
async fn test_delete_all_users_keeps_acting_admin() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "delete_users").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/users/delete")
        .add_header(name, value)
        .form(&[
            ("subtype", "subscriber"),
            ("delete_all", "1"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/admin/manage-users?message=3+users+deleted+successfully."
    );
    assert!(app.accounts.get(ADMIN_ID).unwrap().is_some());
    assert!(app.accounts.get(2).unwrap().is_some(), "editor role untouched");
    assert_eq!(app.accounts.len().unwrap(), 2);
}

#[tokio::test]
async fn test_delete_all_posts_ignores_acting_admin_id() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "delete_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("delete_all", "1"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/admin/manage-posts?message=5+posts+deleted+successfully."
    );
    assert!(app.posts.get(ADMIN_ID).unwrap().is_none());
    assert!(app.posts.get(20).unwrap().is_some(), "pages untouched");
    assert_eq!(app.posts.len().unwrap(), 1);
}

#[tokio::test]
async fn test_inverted_range_is_rejected_before_deleting() {
    let app = create_test_app();
    let nonce = nonce_for(&app.server, "delete_posts").await;
    let (name, value) = bearer(ADMIN_TOKEN);

    let response = app
        .server
        .post("/admin/posts/delete")
        .add_header(name, value)
        .form(&[
            ("subtype", "post"),
            ("date_option", "range"),
            ("date_start", "2024-05-01"),
            ("date_end", "2024-01-01"),
            ("nonce", nonce.as_str()),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert!(!location(&response).contains("deleted+successfully"));
    assert_eq!(app.posts.len().unwrap(), 6);
}
