use contracts::dashboards::d100_sales_overview::DashboardView;
use contracts::shared::indicators::*;

use crate::shared::format::{format_money, format_number, NO_DATA_PLACEHOLDER};
use crate::shared::indicators::metadata::{ids, CURRENCY};

fn money_value(id: IndicatorId, value: Option<f64>) -> IndicatorValue {
    IndicatorValue {
        id,
        value,
        display: value
            .map(|v| format_money(v, CURRENCY))
            .unwrap_or_else(|| NO_DATA_PLACEHOLDER.to_string()),
    }
}

/// KPI cards for a computed view, in catalogue order.
///
/// The daily average has no value when nothing matched the filters.
pub fn kpi_values(view: &DashboardView) -> Vec<IndicatorValue> {
    vec![
        money_value(ids::total_revenue(), Some(view.total_revenue)),
        IndicatorValue {
            id: ids::total_units(),
            value: Some(view.total_units as f64),
            display: format_number(view.total_units),
        },
        money_value(ids::avg_daily_revenue(), view.avg_daily_revenue.value()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d100_sales_overview::DailyAverage;

    #[test]
    fn test_kpis_for_view() {
        let view = DashboardView {
            total_revenue: 1234.5,
            total_units: 12000,
            avg_daily_revenue: DailyAverage::Value(617.25),
            ..DashboardView::empty()
        };

        let kpis = kpi_values(&view);
        assert_eq!(kpis.len(), 3);
        assert_eq!(kpis[0].id, ids::total_revenue());
        assert_eq!(kpis[0].display, "1,234.50 €");
        assert_eq!(kpis[1].display, "12,000");
        assert_eq!(kpis[2].value, Some(617.25));
        assert_eq!(kpis[2].display, "617.25 €");
    }

    #[test]
    fn test_no_data_is_not_zero() {
        let kpis = kpi_values(&DashboardView::empty());

        assert_eq!(kpis[0].value, Some(0.0));
        assert_eq!(kpis[0].display, "0.00 €");
        assert_eq!(kpis[2].value, None);
        assert_eq!(kpis[2].display, NO_DATA_PLACEHOLDER);
    }
}
