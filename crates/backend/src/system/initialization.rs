use anyhow::{Context, Result};
use std::sync::Arc;

use crate::shared::config::{Config, DatasetLocation};
use crate::shared::data::source::{
    DatasetFormat, DatasetSource, LocalFileSource, ParseOptions, RemoteSource,
};
use crate::shared::data::store::{initialize_store, DatasetStore};

/// Build the configured dataset source (local file or URL)
pub fn build_dataset_source(config: &Config) -> Result<Arc<dyn DatasetSource>> {
    let dataset = &config.dataset;
    let location = dataset.location()?;

    let name = match &location {
        DatasetLocation::File(path) => path.to_string_lossy().into_owned(),
        DatasetLocation::Url(url) => url.clone(),
    };
    let options = ParseOptions {
        format: dataset.format.unwrap_or_else(|| DatasetFormat::detect(&name)),
        sheet: dataset.sheet.clone(),
        columns: dataset.columns.clone(),
    };
    tracing::info!("Dataset source: {} ({:?})", name, options.format);

    let source: Arc<dyn DatasetSource> = match location {
        DatasetLocation::File(path) => Arc::new(LocalFileSource::new(path, options)),
        DatasetLocation::Url(url) => Arc::new(
            RemoteSource::new(url, dataset.request_timeout_seconds, options)
                .context("failed to build HTTP client")?,
        ),
    };
    Ok(source)
}

/// Create the dataset store, run the initial load and install it globally.
///
/// A failed initial load is not fatal: the server starts with an empty
/// dataset and reports the error in the dataset status.
pub async fn initialize_dataset_store(config: &Config) -> Result<Arc<DatasetStore>> {
    let source = build_dataset_source(config)?;
    let store = Arc::new(DatasetStore::new(source));

    match store.reload().await {
        Ok(count) => tracing::info!("Initial dataset load: {} records", count),
        Err(e) => tracing::warn!("Starting with an empty dataset: {}", e),
    }

    initialize_store(Arc::clone(&store));
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::parse_config;

    #[tokio::test]
    async fn test_local_csv_source_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ventes.csv");
        std::fs::write(
            &path,
            "Date;Rayon;Produit;CA TTC (€);Nb Articles Vendus\n02/03/2024;Frais;Lait;3,5;2\n",
        )
        .unwrap();

        let config = parse_config(&format!(
            "[dataset]\npath = {:?}\n",
            path.to_string_lossy()
        ))
        .unwrap();

        let source = build_dataset_source(&config).unwrap();
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revenue, 3.5);
    }

    #[test]
    fn test_url_source_from_config() {
        let config = parse_config(
            "[dataset]\nurl = \"https://example.org/Tableau_Ventes.xlsx\"\n",
        )
        .unwrap();
        let source = build_dataset_source(&config).unwrap();
        assert_eq!(source.describe(), "https://example.org/Tableau_Ventes.xlsx");
    }
}
