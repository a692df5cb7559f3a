//! In-process link store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, LinkAnalytics, NewClick, NewLink};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::error::AppError;

struct StoredLink {
    link: Link,
    analytics: LinkAnalytics,
    unique_ips: HashSet<String>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    links: HashMap<i64, StoredLink>,
    by_alias: HashMap<String, i64>,
}

/// Link and analytics store kept entirely in memory.
///
/// Implements both [`LinkRepository`] and [`AnalyticsRepository`]. Every
/// click is applied under one write lock, so concurrent clicks never lose
/// increments. Data is gone when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut state = self.state.write().await;

        if state.by_alias.contains_key(&new_link.alias) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_alias_key" }),
            ));
        }

        state.next_id += 1;
        let id = state.next_id;

        let link = Link::new(
            id,
            new_link.owner_id,
            new_link.alias,
            new_link.long_url,
            new_link.topic,
            Utc::now(),
        );

        state.by_alias.insert(link.alias.clone(), id);
        state.links.insert(
            id,
            StoredLink {
                link: link.clone(),
                analytics: LinkAnalytics::default(),
                unique_ips: HashSet::new(),
            },
        );

        Ok(link)
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<Link>, AppError> {
        let state = self.state.read().await;

        Ok(state
            .by_alias
            .get(alias)
            .and_then(|id| state.links.get(id))
            .map(|stored| stored.link.clone()))
    }

    async fn find_by_owner_and_long_url(
        &self,
        owner_id: &str,
        long_url: &str,
    ) -> Result<Option<Link>, AppError> {
        let state = self.state.read().await;

        Ok(state
            .links
            .values()
            .map(|stored| &stored.link)
            .filter(|link| link.is_owned_by(owner_id) && link.long_url == long_url)
            .min_by_key(|link| link.id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        let state = self.state.read().await;

        let mut links: Vec<Link> = state
            .links
            .values()
            .filter(|stored| stored.link.is_owned_by(owner_id))
            .map(|stored| stored.link.clone())
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn delete_for_owner(&self, id: i64, owner_id: &str) -> Result<Option<Link>, AppError> {
        let mut state = self.state.write().await;

        let owned = state
            .links
            .get(&id)
            .is_some_and(|stored| stored.link.is_owned_by(owner_id));
        if !owned {
            return Ok(None);
        }

        let Some(stored) = state.links.remove(&id) else {
            return Ok(None);
        };
        state.by_alias.remove(&stored.link.alias);

        Ok(Some(stored.link))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[async_trait]
impl AnalyticsRepository for MemoryStore {
    async fn record_click(&self, alias: &str, click: &NewClick) -> Result<bool, AppError> {
        let mut state = self.state.write().await;

        let Some(id) = state.by_alias.get(alias).copied() else {
            return Ok(false);
        };
        let Some(stored) = state.links.get_mut(&id) else {
            return Ok(false);
        };
        if click.clicked_at < stored.link.created_at {
            return Ok(false);
        }

        let is_new_visitor = click
            .ip
            .as_ref()
            .is_some_and(|ip| stored.unique_ips.insert(ip.clone()));
        stored.analytics.record(click, is_new_visitor);

        Ok(true)
    }

    async fn get_analytics(&self, link_id: i64) -> Result<LinkAnalytics, AppError> {
        let state = self.state.read().await;

        Ok(state
            .links
            .get(&link_id)
            .map(|stored| stored.analytics.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, TimeDelta};
    use std::sync::Arc;

    fn new_link(owner: &str, alias: &str, long_url: &str) -> NewLink {
        NewLink {
            owner_id: owner.to_string(),
            alias: alias.to_string(),
            long_url: long_url.to_string(),
            topic: "misc".to_string(),
        }
    }

    fn click(ip: Option<&str>) -> NewClick {
        NewClick {
            ip: ip.map(str::to_string),
            os_type: "Linux".to_string(),
            device_type: "pc".to_string(),
            clicked_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryStore::new();
        let created = store
            .create(new_link("u1", "abc", "https://example.com"))
            .await
            .unwrap();

        let found = store.find_by_alias("abc").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(store.find_by_alias("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_alias_is_conflict() {
        let store = MemoryStore::new();
        store
            .create(new_link("u1", "dup", "https://a.example"))
            .await
            .unwrap();

        let err = store
            .create(new_link("u2", "dup", "https://b.example"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_find_by_owner_and_long_url_is_owner_scoped() {
        let store = MemoryStore::new();
        store
            .create(new_link("u1", "one", "https://example.com"))
            .await
            .unwrap();

        assert!(
            store
                .find_by_owner_and_long_url("u1", "https://example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .find_by_owner_and_long_url("u2", "https://example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let store = MemoryStore::new();
        for alias in ["first", "second", "third"] {
            store
                .create(new_link("u1", alias, &format!("https://{alias}.example")))
                .await
                .unwrap();
        }
        store
            .create(new_link("u2", "other", "https://other.example"))
            .await
            .unwrap();

        let aliases: Vec<_> = store
            .list_by_owner("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.alias)
            .collect();

        assert_eq!(aliases, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_delete_requires_owner() {
        let store = MemoryStore::new();
        let link = store
            .create(new_link("u1", "mine", "https://example.com"))
            .await
            .unwrap();

        assert!(store.delete_for_owner(link.id, "u2").await.unwrap().is_none());
        assert!(store.find_by_alias("mine").await.unwrap().is_some());

        let deleted = store.delete_for_owner(link.id, "u1").await.unwrap();
        assert_eq!(deleted.map(|l| l.alias), Some("mine".to_string()));
        assert!(store.find_by_alias("mine").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_alias_reusable_after_delete() {
        let store = MemoryStore::new();
        let link = store
            .create(new_link("u1", "again", "https://example.com"))
            .await
            .unwrap();
        store.delete_for_owner(link.id, "u1").await.unwrap();

        assert!(
            store
                .create(new_link("u1", "again", "https://example.com"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_record_click_unknown_alias() {
        let store = MemoryStore::new();
        assert!(!store.record_click("nope", &click(Some("1.1.1.1"))).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_click_counts_unique_ips() {
        let store = MemoryStore::new();
        let link = store
            .create(new_link("u1", "abc", "https://example.com"))
            .await
            .unwrap();

        for ip in ["1.1.1.1", "2.2.2.2", "1.1.1.1", "3.3.3.3"] {
            assert!(store.record_click("abc", &click(Some(ip))).await.unwrap());
        }
        store.record_click("abc", &click(None)).await.unwrap();

        let analytics = store.get_analytics(link.id).await.unwrap();
        assert_eq!(analytics.total_clicks, 5);
        assert_eq!(analytics.unique_clicks, 3);
        assert_eq!(analytics.os_type[0].unique_clicks, 5);
    }

    #[tokio::test]
    async fn test_record_click_day_buckets() {
        let store = MemoryStore::new();
        let link = store
            .create(new_link("u1", "days", "https://example.com"))
            .await
            .unwrap();

        let tomorrow = Utc::now().date_naive() + Days::new(1);
        let mut late = click(Some("1.1.1.1"));
        late.clicked_at = tomorrow.and_hms_opt(23, 59, 59).unwrap().and_utc();
        let mut early = click(Some("1.1.1.1"));
        early.clicked_at = (tomorrow + Days::new(1))
            .and_hms_opt(0, 0, 1)
            .unwrap()
            .and_utc();

        store.record_click("days", &late).await.unwrap();
        store.record_click("days", &early).await.unwrap();

        let analytics = store.get_analytics(link.id).await.unwrap();
        assert_eq!(analytics.clicks_by_date.len(), 2);
    }

    #[tokio::test]
    async fn test_click_before_link_creation_is_ignored() {
        let store = MemoryStore::new();
        let mut stale = click(Some("1.1.1.1"));
        stale.clicked_at = Utc::now() - TimeDelta::seconds(5);

        let old = store
            .create(new_link("u1", "reuse", "https://old.example"))
            .await
            .unwrap();
        store.delete_for_owner(old.id, "u1").await.unwrap();
        let fresh = store
            .create(new_link("u2", "reuse", "https://new.example"))
            .await
            .unwrap();

        assert!(!store.record_click("reuse", &stale).await.unwrap());
        assert!(store.record_click("reuse", &click(Some("2.2.2.2"))).await.unwrap());

        let analytics = store.get_analytics(fresh.id).await.unwrap();
        assert_eq!(analytics.total_clicks, 1);
        assert_eq!(analytics.unique_clicks, 1);
    }

    #[tokio::test]
    async fn test_concurrent_clicks_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let link = store
            .create(new_link("u1", "hot", "https://example.com"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let ip = format!("10.0.0.{i}");
                store.record_click("hot", &click(Some(&ip))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let analytics = store.get_analytics(link.id).await.unwrap();
        assert_eq!(analytics.total_clicks, 50);
        assert_eq!(analytics.unique_clicks, 50);
        assert_eq!(analytics.clicks_by_date.len(), 1);
        assert_eq!(analytics.clicks_by_date[0].clicks, 50);
    }
}
