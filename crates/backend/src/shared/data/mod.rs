pub mod error;
pub mod sales_dataset;
pub mod source;
pub mod store;
