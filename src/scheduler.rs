use crate::refresh::MenuSnapshot;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};

/// Start re-fetching the menu into `snapshot` every `interval`.
///
/// Each tick runs independently; a slow fetch does not delay the next one,
/// and the snapshot discards whichever response turns out to be stale.
/// Failures are already logged by the snapshot and simply wait for the next
/// tick.
pub async fn start_poller(snapshot: Arc<MenuSnapshot>, interval: Duration) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    info!("Scheduling menu refresh every {:?}", interval);

    let job = Job::new_repeated_async(interval, move |_uuid, _l| {
        let snapshot = Arc::clone(&snapshot);

        Box::pin(async move {
            if let Ok(published) = snapshot.refresh().await {
                debug!("Menu poll finished (published: {})", published);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("✓ Menu poller started");

    Ok(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::menu::{RawCategory, TranslatedText};
    use crate::store::MenuStore;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_poller_publishes_store_contents() {
        let store = MenuStore::in_memory();
        store
            .put_category(&RawCategory {
                id: "drinks".to_string(),
                title: Some(TranslatedText::from("Drinks")),
                icon: "Coffee".to_string(),
                items: Vec::new(),
            })
            .await
            .unwrap();
        let snapshot = Arc::new(MenuSnapshot::new(store));

        let mut scheduler = start_poller(snapshot.clone(), Duration::from_millis(200))
            .await
            .expect("scheduler should start");

        let mut published = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if !snapshot.view(Language::ENGLISH).await.categories.is_empty() {
                published = true;
                break;
            }
        }
        scheduler.shutdown().await.expect("shutdown");

        assert!(published, "poller never refreshed the snapshot");
    }
}
