use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::d100_sales_overview;
use crate::system::middleware::request_logger::request_logger;

/// Configure all application routes
pub fn configure_routes() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D100 SALES OVERVIEW DASHBOARD
        // ========================================
        .route(
            "/api/d100/sales_overview",
            post(d100_sales_overview::get_sales_overview),
        )
        .route(
            "/api/d100/filter_options",
            get(d100_sales_overview::get_filter_options),
        )
        .route(
            "/api/d100/indicators/meta",
            get(d100_sales_overview::get_indicator_catalog),
        )
        // Dataset snapshot
        .route(
            "/api/d100/dataset/status",
            get(d100_sales_overview::get_dataset_status),
        )
        .route(
            "/api/d100/dataset/reload",
            post(d100_sales_overview::reload_dataset),
        )
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
}
