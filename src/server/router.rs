//! Route table for the admin surface

use super::handlers::{
    AdminState, delete_posts, delete_users, export_posts, export_users, issue_nonce,
};
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

/// Build the admin action routes
///
/// - POST /admin/posts/export - Export content items as CSV
/// - POST /admin/posts/delete - Bulk delete content items
/// - POST /admin/users/export - Export accounts as CSV
/// - POST /admin/users/delete - Bulk delete accounts
/// - GET /admin/nonce/{action} - Issue a nonce for one of the actions above
pub fn build_admin_routes(state: AdminState) -> Router {
    Router::new()
        .route("/admin/posts/export", post(export_posts))
        .route("/admin/posts/delete", post(delete_posts))
        .route("/admin/users/export", post(export_users))
        .route("/admin/users/delete", post(delete_users))
        .route("/admin/nonce/{action}", get(issue_nonce))
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
    }))
}
