use std::sync::Arc;

use crate::shared::config::Config;
use crate::shared::data::store::DatasetStore;

use super::dataset_refresh::DatasetRefreshWorker;

/// Spawns the periodic refresh when `refresh_interval_seconds` is set.
pub fn start_dataset_refresh(config: &Config, store: Arc<DatasetStore>) {
    match config.dataset.refresh_interval() {
        Some(interval) => {
            let worker = DatasetRefreshWorker::new(store, interval);
            tokio::spawn(async move { worker.run_loop().await });
        }
        None => tracing::info!("Periodic dataset refresh disabled, use POST /api/d100/dataset/reload"),
    }
}
