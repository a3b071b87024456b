pub mod history;
pub mod metrics;
pub mod root;
