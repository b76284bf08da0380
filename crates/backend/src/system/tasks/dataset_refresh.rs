use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::shared::data::store::DatasetStore;

/// Background worker re-reading the dataset on a fixed period.
pub struct DatasetRefreshWorker {
    store: Arc<DatasetStore>,
    interval_seconds: u64,
}

impl DatasetRefreshWorker {
    pub fn new(store: Arc<DatasetStore>, interval_seconds: u64) -> Self {
        Self {
            store,
            interval_seconds,
        }
    }

    /// Runs forever. The first reload happens one period after start,
    /// the initial load is done at startup.
    pub async fn run_loop(&self) {
        info!(
            "Dataset refresh worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    async fn tick(&self) {
        if let Err(e) = self.store.reload().await {
            warn!("Periodic dataset refresh failed, keeping previous data: {}", e);
        }
    }
}
