pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::{storage::LocalStorage, ScanConfig};
pub use crate::core::{engine::ScanEngine, pipeline::ScanPipeline};
pub use crate::domain::model::{AddressFamily, Host, Port, PortStatus, ScanResults};
pub use crate::utils::error::{Result, ScanError};
