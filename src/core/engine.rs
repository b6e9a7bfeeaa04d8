use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives a pipeline through preflight, scanning, parsing and reporting.
/// Any stage failing aborts the run before later stages execute.
pub struct ScanEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ScanEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let scanner = self.pipeline.preflight().await?;
        tracing::debug!("Scanner found at {}", scanner.display());

        tracing::info!("Scanning targets...");
        let reports = self.pipeline.extract().await?;
        tracing::debug!("{} scanner reports to parse", reports.len());

        let results = self.pipeline.transform(reports).await?;
        tracing::info!(
            "Parsed {} hosts, {} open ports",
            results.len(),
            results.open_port_count()
        );

        let output_path = self.pipeline.load(results).await?;
        tracing::debug!("HTML report written to {}", output_path);

        Ok(output_path)
    }
}
