use async_trait::async_trait;
use contracts::dashboards::d100_sales_overview::SalesRecord;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::DatasetError;
use super::sales_dataset::{parse_records, read_csv, read_workbook, ColumnNames};

/// File layout of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Csv,
    /// xlsx, xlsm, xls, ods
    Workbook,
}

impl DatasetFormat {
    /// Guess from a file name or URL path, workbook unless it ends in `.csv`
    pub fn detect(name: &str) -> Self {
        let path = name.split(['?', '#']).next().unwrap_or(name);
        if path.to_ascii_lowercase().ends_with(".csv") {
            DatasetFormat::Csv
        } else {
            DatasetFormat::Workbook
        }
    }
}

/// How the raw bytes are turned into records
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub format: DatasetFormat,
    pub sheet: Option<String>,
    pub columns: ColumnNames,
}

impl ParseOptions {
    pub fn parse(&self, bytes: Vec<u8>) -> Result<Vec<SalesRecord>, DatasetError> {
        let table = match self.format {
            DatasetFormat::Csv => read_csv(&bytes)?,
            DatasetFormat::Workbook => read_workbook(bytes, self.sheet.as_deref())?,
        };
        parse_records(&table, &self.columns)
    }
}

/// Provider of the full sales table
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch and parse the whole dataset
    async fn fetch(&self) -> Result<Vec<SalesRecord>, DatasetError>;

    /// Human readable location, shown in the dataset status
    fn describe(&self) -> String;
}

/// Dataset read from the local filesystem on every reload
pub struct LocalFileSource {
    path: PathBuf,
    options: ParseOptions,
}

impl LocalFileSource {
    pub fn new(path: PathBuf, options: ParseOptions) -> Self {
        Self { path, options }
    }
}

#[async_trait]
impl DatasetSource for LocalFileSource {
    async fn fetch(&self) -> Result<Vec<SalesRecord>, DatasetError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DatasetError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        self.options.parse(bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Dataset downloaded over HTTP(S) on every reload
pub struct RemoteSource {
    url: String,
    client: reqwest::Client,
    options: ParseOptions,
}

impl RemoteSource {
    pub fn new(
        url: String,
        timeout_seconds: u64,
        options: ParseOptions,
    ) -> Result<Self, DatasetError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            url,
            client,
            options,
        })
    }
}

#[async_trait]
impl DatasetSource for RemoteSource {
    async fn fetch(&self) -> Result<Vec<SalesRecord>, DatasetError> {
        tracing::debug!("Downloading dataset from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes", bytes.len());
        self.options.parse(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
