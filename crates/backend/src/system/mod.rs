pub mod initialization;
pub mod middleware;
pub mod tasks;
pub mod tracing;
