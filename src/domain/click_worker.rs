//! Background worker applying click events to link analytics.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// Number of retries after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Drains the click channel until every sender is dropped.
///
/// At most `concurrency` events are applied at once. Each application is
/// retried with exponential backoff on store errors; validation-type errors
/// are not retried. Events whose link no longer exists are discarded.
/// Returns once the channel is closed and all in-flight events are done.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    analytics_repository: Arc<dyn AnalyticsRepository>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let repo = analytics_repository.clone();
        tokio::spawn(async move {
            process_event(repo.as_ref(), &event).await;
            drop(permit);
        });
    }

    // Wait for in-flight events before reporting shutdown.
    let _ = permits.acquire_many(concurrency.max(1) as u32).await;
    info!("Click worker stopped");
}

/// Applies a single event with retry.
pub async fn process_event(repo: &dyn AnalyticsRepository, event: &ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let click = event.to_new_click();

    let result = RetryIf::start(
        strategy,
        || repo.record_click(&event.alias, &click),
        |e: &AppError| matches!(e, AppError::Internal { .. }),
    )
    .await;

    match result {
        Ok(true) => debug!(alias = %event.alias, "Click recorded"),
        Ok(false) => debug!(alias = %event.alias, "Click dropped: link no longer exists"),
        Err(e) => error!(alias = %event.alias, error = %e, "Failed to record click"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockAnalyticsRepository;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_process_event_records_click() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_record_click()
            .withf(|alias, click| alias == "abc" && click.os_type == "Linux")
            .times(1)
            .returning(|_, _| Ok(true));

        let event = ClickEvent::new("abc".to_string(), None, "Linux", "pc");
        process_event(&repo, &event).await;
    }

    #[tokio::test]
    async fn test_process_event_retries_store_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut repo = MockAnalyticsRepository::new();
        repo.expect_record_click().returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::internal("Database error", json!({})))
            } else {
                Ok(true)
            }
        });

        let event = ClickEvent::new("abc".to_string(), None, "Linux", "pc");
        process_event(&repo, &event).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_process_event_gives_up_after_max_retries() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_record_click()
            .times(MAX_RETRIES + 1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let event = ClickEvent::new("abc".to_string(), None, "Linux", "pc");
        process_event(&repo, &event).await;
    }

    #[tokio::test]
    async fn test_process_event_does_not_retry_non_store_errors() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_record_click()
            .times(1)
            .returning(|_, _| Err(AppError::bad_request("bad", json!({}))));

        let event = ClickEvent::new("abc".to_string(), None, "Linux", "pc");
        process_event(&repo, &event).await;
    }

    #[tokio::test]
    async fn test_worker_drains_channel_and_stops() {
        let mut repo = MockAnalyticsRepository::new();
        repo.expect_record_click()
            .times(3)
            .returning(|_, _| Ok(true));

        let (tx, rx) = mpsc::channel(10);
        for i in 0..3 {
            tx.send(ClickEvent::new(format!("a{i}"), None, "Linux", "pc"))
                .await
                .unwrap();
        }
        drop(tx);

        run_click_worker(rx, Arc::new(repo), 2).await;
    }
}
