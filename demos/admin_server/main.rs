//! Admin server example with seeded in-memory stores
//!
//! ```text
//! cargo run --example admin_server [config.yaml]
//!
//! TOKEN=dev-admin-token
//! NONCE=$(curl -s -H "Authorization: Bearer $TOKEN" localhost:3000/admin/nonce/export_posts | jq -r .nonce)
//! curl -s -H "Authorization: Bearer $TOKEN" \
//!     -d "subtype=post&date_option=range&date_start=2024-02-01&date_end=2024-03-31&nonce=$NONCE" \
//!     localhost:3000/admin/posts/export
//! ```

use axum::extract::Query;
use axum::routing::get;
use bulk_admin::prelude::*;
use chrono::TimeZone;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

fn seed_content(store: &InMemoryRecordStore<ContentItem>) -> Result<()> {
    let titles = [
        "Happy new year",
        "Winter sale",
        "Spring cleaning",
        "April notes",
        "May roundup",
    ];
    for (month, title) in (1..=5).zip(titles) {
        let published = Utc.with_ymd_and_hms(2024, month, 15, 9, 30, 0).unwrap();
        let item = ContentItem::new(month as u64, "post", title, published)
            .with_author(1, "admin")
            .with_meta("reading_time", FieldValue::Integer(month as i64 * 2));
        store.insert(item)?;
    }

    let about = ContentItem::new(
        10,
        "page",
        "About us",
        Utc.with_ymd_and_hms(2023, 11, 2, 8, 0, 0).unwrap(),
    );
    store.insert(about)?;
    Ok(())
}

fn seed_accounts(store: &InMemoryRecordStore<Account>) -> Result<()> {
    store.insert(Account::new(
        1,
        "admin",
        "administrator",
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
    ))?;
    for id in 2..=6 {
        store.insert(Account::new(
            id,
            format!("reader{id}"),
            "subscriber",
            Utc.with_ymd_and_hms(2024, id as u32, 3, 12, 0, 0).unwrap(),
        ))?;
    }
    Ok(())
}

/// Stand-in for the admin pages redirects land on
async fn admin_page(Query(params): Query<HashMap<String, String>>) -> String {
    params
        .get("message")
        .cloned()
        .unwrap_or_else(|| "Bulk admin".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,bulk_admin=debug")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AdminConfig::from_yaml_file(&path)?,
        None => AdminConfig::default_config(),
    };

    let posts = InMemoryRecordStore::<ContentItem>::new();
    let accounts = InMemoryRecordStore::<Account>::new();
    seed_content(&posts)?;
    seed_accounts(&accounts)?;

    tracing::info!(
        posts = posts.len()?,
        accounts = accounts.len()?,
        "seeded in-memory stores"
    );

    let pages = axum::Router::new()
        .route(&config.pages.posts, get(admin_page))
        .route(&config.pages.users, get(admin_page));

    AdminServerBuilder::new()
        .with_config(config)
        .with_content_store(posts)
        .with_account_store(accounts)
        .with_custom_routes(pages)
        .serve()
        .await
}
