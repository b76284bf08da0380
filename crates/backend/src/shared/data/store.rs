use chrono::{DateTime, Utc};
use contracts::dashboards::d100_sales_overview::{DatasetStatus, SalesRecord};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::error::DatasetError;
use super::source::DatasetSource;

static STORE: OnceCell<Arc<DatasetStore>> = OnceCell::new();

/// Install the process-wide store. Subsequent calls are ignored.
pub fn initialize_store(store: Arc<DatasetStore>) {
    if STORE.set(store).is_err() {
        tracing::warn!("Dataset store already initialized");
    }
}

pub fn get_store() -> Option<Arc<DatasetStore>> {
    STORE.get().cloned()
}

/// Immutable dataset shared by all requests until the next reload
#[derive(Debug, Default)]
pub struct DatasetSnapshot {
    pub records: Arc<Vec<SalesRecord>>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Holds the last good dataset and replaces it on explicit reloads
pub struct DatasetStore {
    source: Arc<dyn DatasetSource>,
    snapshot: RwLock<Arc<DatasetSnapshot>>,
    reload_lock: Mutex<()>,
}

impl DatasetStore {
    /// Creates an empty store; call `reload` to load data
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(DatasetSnapshot::default())),
            reload_lock: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> Arc<DatasetSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Fetch the dataset again and swap the snapshot.
    ///
    /// On failure the previous records stay in place and the error is
    /// recorded in `last_error`.
    pub async fn reload(&self) -> Result<usize, DatasetError> {
        let _guard = self.reload_lock.lock().await;
        let started = std::time::Instant::now();

        match self.source.fetch().await {
            Ok(records) => {
                let count = records.len();
                let snapshot = DatasetSnapshot {
                    records: Arc::new(records),
                    loaded_at: Some(Utc::now()),
                    last_error: None,
                };
                *self.snapshot.write().await = Arc::new(snapshot);
                tracing::info!(
                    "Dataset reloaded from {}: {} records in {}ms",
                    self.source.describe(),
                    count,
                    started.elapsed().as_millis()
                );
                Ok(count)
            }
            Err(e) => {
                tracing::error!(
                    "Dataset reload from {} failed: {}",
                    self.source.describe(),
                    e
                );
                let mut current = self.snapshot.write().await;
                let previous = Arc::clone(&*current);
                *current = Arc::new(DatasetSnapshot {
                    records: Arc::clone(&previous.records),
                    loaded_at: previous.loaded_at,
                    last_error: Some(e.to_string()),
                });
                Err(e)
            }
        }
    }

    pub async fn status(&self) -> DatasetStatus {
        let snapshot = self.snapshot().await;
        self.status_of(&snapshot)
    }

    pub fn status_of(&self, snapshot: &DatasetSnapshot) -> DatasetStatus {
        DatasetStatus {
            source: self.source.describe(),
            record_count: snapshot.records.len(),
            loaded_at: snapshot.loaded_at,
            last_error: snapshot.last_error.clone(),
        }
    }
}
