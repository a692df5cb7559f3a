//! PostgreSQL repository tests.
//!
//! Run with `DATABASE_URL` pointing at a disposable server:
//! `cargo test --test repository_pg -- --ignored`

use chrono::{Days, TimeDelta, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use snaplink::domain::entities::{NewClick, NewLink};
use snaplink::domain::repositories::{AnalyticsRepository, LinkRepository};
use snaplink::error::AppError;
use snaplink::infrastructure::persistence::{PgAnalyticsRepository, PgLinkRepository};

fn new_link(owner: &str, alias: &str, long_url: &str) -> NewLink {
    NewLink {
        owner_id: owner.to_string(),
        alias: alias.to_string(),
        long_url: long_url.to_string(),
        topic: "misc".to_string(),
    }
}

fn click(ip: &str, os: &str, device: &str) -> NewClick {
    NewClick {
        ip: Some(ip.to_string()),
        os_type: os.to_string(),
        device_type: device.to_string(),
        clicked_at: Utc::now(),
    }
}

fn repos(pool: PgPool) -> (PgLinkRepository, PgAnalyticsRepository) {
    let pool = Arc::new(pool);
    (
        PgLinkRepository::new(pool.clone()),
        PgAnalyticsRepository::new(pool),
    )
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_create_and_find_by_alias(pool: PgPool) {
    let (links, _) = repos(pool);

    let created = links
        .create(new_link("u1", "abc123", "https://example.com"))
        .await
        .unwrap();
    assert_eq!(created.alias, "abc123");
    assert_eq!(created.owner_id, "u1");

    let found = links.find_by_alias("abc123").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(links.find_by_alias("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_alias_is_conflict(pool: PgPool) {
    let (links, _) = repos(pool);

    links
        .create(new_link("u1", "dup", "https://a.example"))
        .await
        .unwrap();
    let err = links
        .create(new_link("u2", "dup", "https://b.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_owner_scoped_lookup_list_and_delete(pool: PgPool) {
    let (links, _) = repos(pool);

    let first = links
        .create(new_link("u1", "first", "https://one.example"))
        .await
        .unwrap();
    links
        .create(new_link("u1", "second", "https://two.example"))
        .await
        .unwrap();
    links
        .create(new_link("u2", "other", "https://one.example"))
        .await
        .unwrap();

    let existing = links
        .find_by_owner_and_long_url("u1", "https://one.example")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(existing.alias, "first");

    let aliases: Vec<_> = links
        .list_by_owner("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.alias)
        .collect();
    assert_eq!(aliases, vec!["second", "first"]);

    assert!(links.delete_for_owner(first.id, "u2").await.unwrap().is_none());
    assert!(links.delete_for_owner(first.id, "u1").await.unwrap().is_some());
    assert!(links.find_by_alias("first").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_record_click_aggregates(pool: PgPool) {
    let (links, analytics) = repos(pool);
    let link = links
        .create(new_link("u1", "hits", "https://example.com"))
        .await
        .unwrap();

    for (ip, os, device) in [
        ("1.1.1.1", "Windows 10", "pc"),
        ("2.2.2.2", "iPhone", "smartphone"),
        ("1.1.1.1", "Windows 10", "pc"),
    ] {
        assert!(analytics.record_click("hits", &click(ip, os, device)).await.unwrap());
    }

    let report = analytics.get_analytics(link.id).await.unwrap();
    assert_eq!(report.total_clicks, 3);
    assert_eq!(report.unique_clicks, 2);
    assert_eq!(report.os_type[0].name, "Windows 10");
    assert_eq!(report.os_type[0].unique_clicks, 2);
    assert_eq!(report.device_type[1].name, "smartphone");
    assert_eq!(report.clicks_by_date.len(), 1);
    assert_eq!(report.clicks_by_date[0].clicks, 3);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_record_click_day_buckets_are_utc(pool: PgPool) {
    let (links, analytics) = repos(pool);
    let link = links
        .create(new_link("u1", "days", "https://example.com"))
        .await
        .unwrap();

    let first_day = Utc::now().date_naive() + Days::new(1);
    let second_day = first_day + Days::new(1);

    let mut late = click("1.1.1.1", "Linux", "pc");
    late.clicked_at = first_day.and_hms_opt(23, 59, 59).unwrap().and_utc();
    let mut early = click("1.1.1.1", "Linux", "pc");
    early.clicked_at = second_day.and_hms_opt(0, 0, 1).unwrap().and_utc();

    analytics.record_click("days", &early).await.unwrap();
    analytics.record_click("days", &late).await.unwrap();

    let report = analytics.get_analytics(link.id).await.unwrap();
    let days: Vec<_> = report.clicks_by_date.iter().map(|d| d.date).collect();
    assert_eq!(days, vec![first_day, second_day]);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_click_older_than_reused_alias_is_ignored(pool: PgPool) {
    let (links, analytics) = repos(pool);
    let mut stale = click("1.1.1.1", "Linux", "pc");
    stale.clicked_at = Utc::now() - TimeDelta::minutes(5);

    let old = links
        .create(new_link("u1", "reuse", "https://old.example"))
        .await
        .unwrap();
    links.delete_for_owner(old.id, "u1").await.unwrap();
    let fresh = links
        .create(new_link("u2", "reuse", "https://new.example"))
        .await
        .unwrap();

    assert!(!analytics.record_click("reuse", &stale).await.unwrap());

    let report = analytics.get_analytics(fresh.id).await.unwrap();
    assert_eq!(report.total_clicks, 0);
    assert!(report.os_type.is_empty());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_record_click_unknown_alias(pool: PgPool) {
    let (_, analytics) = repos(pool);

    assert!(
        !analytics
            .record_click("nope", &click("1.1.1.1", "Linux", "pc"))
            .await
            .unwrap()
    );
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_concurrent_clicks_are_not_lost(pool: PgPool) {
    let (links, analytics) = repos(pool);
    let link = links
        .create(new_link("u1", "hot", "https://example.com"))
        .await
        .unwrap();
    let analytics = Arc::new(analytics);

    let mut handles = Vec::new();
    for i in 0..20 {
        let analytics = analytics.clone();
        handles.push(tokio::spawn(async move {
            let ip = format!("10.0.0.{i}");
            analytics
                .record_click("hot", &click(&ip, "Linux", "pc"))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let report = analytics.get_analytics(link.id).await.unwrap();
    assert_eq!(report.total_clicks, 20);
    assert_eq!(report.unique_clicks, 20);
    assert_eq!(report.os_type[0].unique_clicks, 20);
}
