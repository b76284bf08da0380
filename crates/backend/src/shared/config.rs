use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::shared::data::sales_dataset::ColumnNames;
use crate::shared::data::source::DatasetFormat;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Where the sales table comes from and how often it is re-read
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Local file (xlsx/xls/ods/csv)
    pub path: Option<String>,
    /// Remote file downloaded on every reload
    pub url: Option<String>,
    /// Overrides format detection by extension
    pub format: Option<DatasetFormat>,
    /// Worksheet name, first sheet when absent
    pub sheet: Option<String>,
    /// Polling period; None or 0 disables the refresh worker
    pub refresh_interval_seconds: Option<u64>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub columns: ColumnNames,
}

fn default_request_timeout() -> u64 {
    30
}

/// Resolved dataset location
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetLocation {
    File(PathBuf),
    Url(String),
}

impl DatasetConfig {
    pub fn location(&self) -> anyhow::Result<DatasetLocation> {
        match (&self.path, &self.url) {
            (Some(_), Some(_)) => {
                anyhow::bail!("dataset: set either `path` or `url`, not both")
            }
            (Some(path), None) => Ok(DatasetLocation::File(resolve_dataset_path(path))),
            (None, Some(url)) => Ok(DatasetLocation::Url(url.clone())),
            (None, None) => anyhow::bail!("dataset: one of `path` or `url` is required"),
        }
    }

    /// Interval of the refresh worker, if polling is enabled
    pub fn refresh_interval(&self) -> Option<u64> {
        self.refresh_interval_seconds.filter(|s| *s > 0)
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[dataset]
path = "data/sales_sample.csv"
refresh_interval_seconds = 60
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    candidates.push(PathBuf::from("config.toml"));

    for config_path in candidates {
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            return parse_config(&contents);
        }
        tracing::debug!("config.toml not found at: {}", config_path.display());
    }

    tracing::warn!("config.toml not found, using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    // Fail at startup rather than on the first reload
    config.dataset.location()?;
    Ok(config)
}

/// Resolves relative paths against the executable directory first,
/// then the current directory
pub fn resolve_dataset_path(path: &str) -> PathBuf {
    let dataset_path = Path::new(path);

    if dataset_path.is_absolute() {
        return dataset_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(dataset_path);
            if resolved_path.exists() {
                return resolved_path;
            }
        }
    }

    PathBuf::from(path)
}
