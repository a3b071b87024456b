pub mod address;
pub mod api;
pub mod chains;
pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod middlewares;
pub mod moralis;
pub mod server;
pub mod types;

pub use errors::{AppError, HistoryError};
