use axum::{http::StatusCode, Json};
use contracts::dashboards::d100_sales_overview::{
    DatasetStatus, FilterOptions, FilterSpec, SalesOverviewResponse,
};
use contracts::shared::indicators::IndicatorCatalogResponse;
use std::sync::Arc;

use crate::dashboards::d100_sales_overview::service;
use crate::shared::data::store::{get_store, DatasetStore};
use crate::shared::indicators::metadata;

fn store() -> Result<Arc<DatasetStore>, StatusCode> {
    get_store().ok_or_else(|| {
        tracing::error!("D100 Dashboard: dataset store is not initialized");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

/// POST /api/d100/sales_overview
///
/// KPIs and chart series for the filters in the body.
pub async fn get_sales_overview(
    Json(filters): Json<FilterSpec>,
) -> Result<Json<SalesOverviewResponse>, StatusCode> {
    tracing::info!(
        "D100 Dashboard: overview for {:?}..{:?}, {} regions, product {:?}",
        filters.start_date,
        filters.end_date,
        filters.regions.len(),
        filters.product
    );

    let store = store()?;
    let response = service::get_sales_overview(&store, &filters).await;

    tracing::info!(
        "D100 Dashboard: returning {} dates, {} regions, {} product points",
        response.view.revenue_by_date.len(),
        response.view.revenue_by_region.len(),
        response.view.product_revenue_by_date.len()
    );
    Ok(Json(response))
}

/// GET /api/d100/filter_options
pub async fn get_filter_options() -> Result<Json<FilterOptions>, StatusCode> {
    let store = store()?;
    Ok(Json(service::get_filter_options(&store).await))
}

/// GET /api/d100/indicators/meta
pub async fn get_indicator_catalog() -> Json<IndicatorCatalogResponse> {
    Json(metadata::build_catalog())
}

/// GET /api/d100/dataset/status
pub async fn get_dataset_status() -> Result<Json<DatasetStatus>, StatusCode> {
    let store = store()?;
    Ok(Json(store.status().await))
}

/// POST /api/d100/dataset/reload
///
/// Re-reads the dataset now. Answers 502 with the status body when the
/// source could not be loaded; the previous data stays in use.
pub async fn reload_dataset() -> Result<(StatusCode, Json<DatasetStatus>), StatusCode> {
    let store = store()?;
    let (code, status) = reload_and_report(&store).await;
    Ok((code, Json(status)))
}

async fn reload_and_report(store: &DatasetStore) -> (StatusCode, DatasetStatus) {
    let result = store.reload().await;
    let status = store.status().await;

    match result {
        Ok(count) => {
            tracing::info!("D100 Dashboard: manual reload loaded {} records", count);
            (StatusCode::OK, status)
        }
        Err(e) => {
            tracing::error!("D100 Dashboard: manual reload failed: {}", e);
            (StatusCode::BAD_GATEWAY, status)
        }
    }
}
