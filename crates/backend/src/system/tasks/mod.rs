pub mod dataset_refresh;
pub mod initialization;
