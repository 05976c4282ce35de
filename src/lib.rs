pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::postgres::PgSource;
pub use adapters::storage::LocalStorage;
pub use config::AppConfig;
pub use core::engine::ConvertEngine;
pub use utils::error::{ConvertError, Result};
