use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::indicators::IndicatorValue;

/// One row of the sales dataset, validated at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    /// Sales region / department ("rayon")
    pub region: String,
    pub product: String,
    /// Revenue incl. VAT, never negative
    pub revenue: f64,
    pub units_sold: u64,
}

/// Filter values selected by the user
///
/// Every field is optional: missing dates fall back to the dataset bounds,
/// an empty region list means "all regions".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub product: Option<String>,
}

impl FilterSpec {
    /// Selected product, treating an empty label as "nothing selected"
    pub fn selected_product(&self) -> Option<&str> {
        self.product.as_deref().filter(|p| !p.is_empty())
    }
}

/// Mean of per-day revenue sums.
///
/// `NoData` is returned when nothing matched the filters; it must never be
/// displayed as a zero amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DailyAverage {
    Value(f64),
    NoData,
}

impl DailyAverage {
    pub fn value(&self) -> Option<f64> {
        match self {
            DailyAverage::Value(v) => Some(*v),
            DailyAverage::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, DailyAverage::NoData)
    }
}

/// Revenue summed for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// Revenue summed for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPoint {
    pub region: String,
    pub revenue: f64,
}

/// Everything the dashboard draws for one filter selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub total_revenue: f64,
    pub total_units: u64,
    pub avg_daily_revenue: DailyAverage,
    /// Ascending by date, one entry per date
    pub revenue_by_date: Vec<DatePoint>,
    /// One entry per region, in order of first appearance
    pub revenue_by_region: Vec<RegionPoint>,
    /// Empty when no product is selected
    pub product_revenue_by_date: Vec<DatePoint>,
}

impl DashboardView {
    /// View of an empty filtered set
    pub fn empty() -> Self {
        Self {
            total_revenue: 0.0,
            total_units: 0,
            avg_daily_revenue: DailyAverage::NoData,
            revenue_by_date: Vec::new(),
            revenue_by_region: Vec::new(),
            product_revenue_by_date: Vec::new(),
        }
    }
}

/// Values offered by the filter pickers, taken from the whole dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub products: Vec<String>,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

/// State of the loaded dataset snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatus {
    /// Where the data is read from (file path or URL)
    pub source: String,
    pub record_count: usize,
    /// Time of the last successful load
    pub loaded_at: Option<DateTime<Utc>>,
    /// Message of the last failed load, cleared by the next success
    pub last_error: Option<String>,
}

/// Response of POST /api/d100/sales_overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOverviewResponse {
    pub view: DashboardView,
    /// KPI cards in display order
    pub kpis: Vec<IndicatorValue>,
    /// Effective period after defaults were applied (None for an empty dataset)
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub dataset: DatasetStatus,
}
