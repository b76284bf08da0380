use contracts::shared::indicators::*;

/// Well-known indicator IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn total_revenue() -> IndicatorId {
        IndicatorId::new("total_revenue")
    }
    pub fn total_units() -> IndicatorId {
        IndicatorId::new("total_units")
    }
    pub fn avg_daily_revenue() -> IndicatorId {
        IndicatorId::new("avg_daily_revenue")
    }
}

pub const CURRENCY: &str = "€";

fn money() -> ValueFormat {
    ValueFormat::Money {
        currency: CURRENCY.into(),
    }
}

/// Build the catalogue of KPI cards, in display order.
pub fn build_catalog() -> IndicatorCatalogResponse {
    let indicators = vec![
        IndicatorMeta {
            id: ids::total_revenue(),
            label: "Total revenue".into(),
            icon: "euro".into(),
            format: money(),
            description: Some("Revenue incl. VAT over the selected period and regions".into()),
        },
        IndicatorMeta {
            id: ids::total_units(),
            label: "Units sold".into(),
            icon: "package".into(),
            format: ValueFormat::Integer,
            description: Some("Number of items sold".into()),
        },
        IndicatorMeta {
            id: ids::avg_daily_revenue(),
            label: "Avg revenue / day".into(),
            icon: "calendar".into(),
            format: money(),
            description: Some("Mean of daily revenue totals, over days with sales".into()),
        },
    ];

    IndicatorCatalogResponse { indicators }
}
