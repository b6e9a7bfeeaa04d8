use crate::core::invoker::ScanOptions;
use crate::domain::model::{ReportFile, ScanResults};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn binary(&self) -> &str;
    fn stats_every(&self) -> &str;
    fn options(&self) -> &ScanOptions;
    fn targets(&self) -> &[String];
    fn html_report(&self) -> &str;
    fn json_report(&self) -> Option<&str>;
}

/// Receives the scanner's standard output one line at a time.
pub trait LineSink: Send {
    fn on_line(&mut self, line: &str);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn preflight(&self) -> Result<PathBuf>;
    async fn extract(&self) -> Result<Vec<ReportFile>>;
    async fn transform(&self, reports: Vec<ReportFile>) -> Result<ScanResults>;
    async fn load(&self, results: ScanResults) -> Result<String>;
}
