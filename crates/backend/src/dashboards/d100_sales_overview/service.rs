use chrono::NaiveDate;
use contracts::dashboards::d100_sales_overview::{
    DailyAverage, DashboardView, DatePoint, FilterOptions, FilterSpec, RegionPoint, SalesRecord,
    SalesOverviewResponse,
};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::shared::data::store::DatasetStore;
use crate::shared::indicators::compute::kpi_values;

/// Date bounds after falling back to the dataset min/max.
///
/// Returns None for an empty dataset.
pub fn effective_bounds(
    dataset: &[SalesRecord],
    filters: &FilterSpec,
) -> Option<(NaiveDate, NaiveDate)> {
    let min = dataset.iter().map(|r| r.date).min()?;
    let max = dataset.iter().map(|r| r.date).max()?;
    Some((
        filters.start_date.unwrap_or(min),
        filters.end_date.unwrap_or(max),
    ))
}

/// Build the dashboard view for one filter selection.
///
/// Never fails: an empty dataset, an inverted date range or filters that
/// match nothing all produce `DashboardView::empty()`-shaped results.
/// The product filter only narrows `product_revenue_by_date`.
pub fn build_view(dataset: &[SalesRecord], filters: &FilterSpec) -> DashboardView {
    let Some((start, end)) = effective_bounds(dataset, filters) else {
        return DashboardView::empty();
    };

    let regions: HashSet<&str> = filters.regions.iter().map(String::as_str).collect();
    let filtered: Vec<&SalesRecord> = dataset
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .filter(|r| regions.is_empty() || regions.contains(r.region.as_str()))
        .collect();

    if filtered.is_empty() {
        return DashboardView::empty();
    }

    let total_revenue: f64 = filtered.iter().map(|r| r.revenue).sum();
    let total_units = filtered
        .iter()
        .map(|r| r.units_sold)
        .fold(0u64, u64::saturating_add);

    let revenue_by_date = sum_by_date(filtered.iter().copied());
    // Mean of per-day sums, not of individual records
    let day_sum: f64 = revenue_by_date.iter().map(|p| p.revenue).sum();
    let avg_daily_revenue = DailyAverage::Value(day_sum / revenue_by_date.len() as f64);

    // Regions keep the order in which they first appear
    let mut revenue_by_region: Vec<RegionPoint> = Vec::new();
    let mut region_pos: HashMap<&str, usize> = HashMap::new();
    for r in &filtered {
        match region_pos.get(r.region.as_str()) {
            Some(&i) => revenue_by_region[i].revenue += r.revenue,
            None => {
                region_pos.insert(r.region.as_str(), revenue_by_region.len());
                revenue_by_region.push(RegionPoint {
                    region: r.region.clone(),
                    revenue: r.revenue,
                });
            }
        }
    }

    let product_revenue_by_date = match filters.selected_product() {
        Some(product) => sum_by_date(filtered.iter().copied().filter(|r| r.product == product)),
        None => Vec::new(),
    };

    DashboardView {
        total_revenue,
        total_units,
        avg_daily_revenue,
        revenue_by_date,
        revenue_by_region,
        product_revenue_by_date,
    }
}

/// Group by date and sum revenue, ascending by date
fn sum_by_date<'a>(records: impl Iterator<Item = &'a SalesRecord>) -> Vec<DatePoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in records {
        *by_date.entry(r.date).or_insert(0.0) += r.revenue;
    }
    by_date
        .into_iter()
        .map(|(date, revenue)| DatePoint { date, revenue })
        .collect()
}

/// Distinct regions/products of the whole dataset, in order of first appearance
pub fn filter_options(dataset: &[SalesRecord]) -> FilterOptions {
    let mut regions = Vec::new();
    let mut products = Vec::new();
    let mut seen_regions = HashSet::new();
    let mut seen_products = HashSet::new();

    for r in dataset {
        if seen_regions.insert(r.region.as_str()) {
            regions.push(r.region.clone());
        }
        if seen_products.insert(r.product.as_str()) {
            products.push(r.product.clone());
        }
    }

    FilterOptions {
        regions,
        products,
        min_date: dataset.iter().map(|r| r.date).min(),
        max_date: dataset.iter().map(|r| r.date).max(),
    }
}

/// Build the full API response from the store's current snapshot
pub async fn get_sales_overview(
    store: &DatasetStore,
    filters: &FilterSpec,
) -> SalesOverviewResponse {
    let snapshot = store.snapshot().await;
    let records = snapshot.records.as_slice();

    let view = build_view(records, filters);
    let kpis = kpi_values(&view);
    let bounds = effective_bounds(records, filters);

    SalesOverviewResponse {
        kpis,
        date_from: bounds.map(|(from, _)| from),
        date_to: bounds.map(|(_, to)| to),
        dataset: store.status_of(&snapshot),
        view,
    }
}

pub async fn get_filter_options(store: &DatasetStore) -> FilterOptions {
    let snapshot = store.snapshot().await;
    filter_options(&snapshot.records)
}
