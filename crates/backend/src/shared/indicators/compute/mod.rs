pub mod sales;

pub use sales::kpi_values;
