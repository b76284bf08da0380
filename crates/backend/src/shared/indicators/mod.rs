pub mod compute;
pub mod metadata;
