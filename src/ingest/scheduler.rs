//! Periodic background tasks
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::constants::defaults;
use crate::data_mgmt::Reading;

use super::context::SharedContext;
use super::writes::write_snapshot;

/// Owns the spawned ticker tasks; dropping it stops them
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` every `period`, first one period from now
    pub fn every<F, Fut>(&mut self, name: &'static str, period: Duration, mut task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        log::info!("Scheduling '{}' every {}s", name, period.as_secs());
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                log::debug!("Running scheduled task '{}'", name);
                task().await;
            }
        });
        self.tasks.push(handle);
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Register the save-gate opener and the staleness fallback
pub fn schedule_store_tasks(scheduler: &mut Scheduler, ctx: SharedContext) {
    let gate_ctx = ctx.clone();
    scheduler.every("open-save-gate", defaults::GATE_OPEN_PERIOD, move || {
        let ctx = gate_ctx.clone();
        async move {
            ctx.save_gate.open();
            log::debug!("Save gate opened");
        }
    });

    scheduler.every(
        "staleness-fallback",
        defaults::STALENESS_CHECK_PERIOD,
        move || {
            let ctx = ctx.clone();
            async move {
                snapshot_if_stale(&ctx, defaults::STALENESS_THRESHOLD).await;
            }
        },
    );
}

/// Store a sentinel snapshot when no reading arrived within `threshold`.
/// Returns whether a snapshot was attempted.
pub async fn snapshot_if_stale(ctx: &SharedContext, threshold: Duration) -> bool {
    let stale = ctx.latest.read().await.is_stale(Instant::now(), threshold);
    if stale {
        log::info!(
            "No reading received in the last {}s; storing sentinel snapshot",
            threshold.as_secs()
        );
        write_snapshot(ctx, Reading::sentinel()).await;
    }
    stale
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use crate::data_mgmt::documents;
    use crate::ingest::context::tests::{in_memory_context, ACCOUNT};
    use crate::interfaces::firestore::{DocValue, Document};
    use crate::interfaces::in_memory::InMemoryStore;

    /// Let spawned ticker work finish, giving up after `limit` simulated seconds
    async fn wait_for_summary(store: &InMemoryStore, limit: u64) -> Option<Document> {
        let path = documents::account_summary_path(ACCOUNT);
        for _ in 0..limit {
            if let Some(summary) = store.document(&path) {
                return Some(summary);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        store.document(&path)
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_fires_once_per_period() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = Scheduler::new();
        let counter = runs.clone();
        scheduler.every("count", Duration::from_secs(60), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        drop(scheduler);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_opens_every_ten_minutes() {
        let (ctx, _, _) = in_memory_context();
        let mut scheduler = Scheduler::new();
        schedule_store_tasks(&mut scheduler, ctx.clone());

        tokio::time::sleep(Duration::from_secs(9 * 60)).await;
        assert!(!ctx.save_gate.is_open());
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(ctx.save_gate.try_consume());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sentinel_snapshot_when_nothing_received() {
        let (ctx, _, store) = in_memory_context();
        assert!(snapshot_if_stale(&ctx, defaults::STALENESS_THRESHOLD).await);

        let summary = store
            .document(&documents::account_summary_path(ACCOUNT))
            .unwrap();
        let DocValue::Map(system) = &summary["system1"] else {
            panic!("expected system map");
        };
        assert_eq!(system["DO"], DocValue::Double(0.01));
        assert_eq!(system["TDS"], DocValue::Double(0.01));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fallback_while_readings_are_fresh() {
        let (ctx, _, store) = in_memory_context();
        ctx.latest
            .write()
            .await
            .record(crate::data_mgmt::normalize(&json!({"DO": 6})), Instant::now());

        tokio::time::advance(Duration::from_secs(19 * 60)).await;
        assert!(!snapshot_if_stale(&ctx, defaults::STALENESS_THRESHOLD).await);
        assert_eq!(store.merge_count(), 0);

        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        assert!(snapshot_if_stale(&ctx, defaults::STALENESS_THRESHOLD).await);
        assert_eq!(store.merge_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_ticker_stores_sentinel_after_twenty_minutes() {
        let (ctx, _, store) = in_memory_context();
        let mut scheduler = Scheduler::new();
        schedule_store_tasks(&mut scheduler, ctx.clone());

        tokio::time::sleep(Duration::from_secs(19 * 60)).await;
        assert_eq!(store.merge_count(), 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        let summary = wait_for_summary(&store, 100).await.unwrap();
        let DocValue::Map(system) = &summary["system1"] else {
            panic!("expected system map");
        };
        assert_eq!(system["DO"], DocValue::Double(0.01));
        assert_eq!(system["PH"], DocValue::Double(0.01));
        assert_eq!(
            store
                .merges_to(&documents::snapshot_history_path(ACCOUNT))
                .len(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_ticker_skips_when_reading_is_recent() {
        let (ctx, _, store) = in_memory_context();
        let mut scheduler = Scheduler::new();
        schedule_store_tasks(&mut scheduler, ctx.clone());

        tokio::time::sleep(Duration::from_secs(19 * 60)).await;
        ctx.latest
            .write()
            .await
            .record(crate::data_mgmt::normalize(&json!({"DO": 6})), Instant::now());

        tokio::time::sleep(Duration::from_secs(60 + 30)).await;
        assert!(wait_for_summary(&store, 30).await.is_none());
        assert_eq!(store.merge_count(), 0);

        // next check at 40 minutes finds the reading 21 minutes old
        tokio::time::sleep(Duration::from_secs(19 * 60)).await;
        assert!(wait_for_summary(&store, 100).await.is_some());
    }
}
