pub mod errors;
pub mod metrics;
pub mod panic;
