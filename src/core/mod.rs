pub mod classifier;
pub mod engine;
pub mod invoker;
pub mod parser;
pub mod pipeline;

pub use crate::domain::model::{Host, Port, ReportFile, ScanResults};
pub use crate::domain::ports::{ConfigProvider, LineSink, Pipeline, Storage};
pub use crate::utils::error::Result;
