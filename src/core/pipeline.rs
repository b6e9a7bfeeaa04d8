use crate::core::classifier::classify;
use crate::core::invoker::{self, ProgressSink, ScanInvoker};
use crate::core::parser;
use crate::core::{ConfigProvider, Pipeline, ReportFile, ScanResults, Storage};
use crate::domain::model::TargetGroup;
use crate::report::{html, json, write_console};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

pub struct ScanPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ScanPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ScanPipeline<S, C> {
    async fn preflight(&self) -> Result<PathBuf> {
        let path = invoker::verify_system(self.config.binary())?;
        tracing::debug!("Using scanner at {}", path.display());
        Ok(path)
    }

    async fn extract(&self) -> Result<Vec<ReportFile>> {
        let classified = classify(self.config.targets().iter().cloned());
        tracing::debug!(
            "Classified {} targets: {} ipv6, {} other",
            classified.len(),
            classified.ipv6.len(),
            classified.others.len()
        );

        let invoker = ScanInvoker::from_config(&self.config);
        let mut reports = Vec::new();

        // IPv6 群組先掃描，兩次掃描依序執行
        for (group, targets) in [
            (TargetGroup::Ipv6, classified.ipv6),
            (TargetGroup::Other, classified.others),
        ] {
            let mut sink = ProgressSink::new(&targets);
            match invoker.scan(&targets, group, &mut sink).await {
                Ok(Some(path)) => {
                    tracing::debug!(
                        "{} scan done after {} progress updates",
                        group,
                        sink.updates()
                    );
                    reports.push(ReportFile {
                        path,
                        group,
                        targets,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    for report in &reports {
                        tracing::warn!(
                            "Dropping {} report for [{}] after failed {} scan",
                            report.group,
                            report.targets.join(", "),
                            group
                        );
                    }
                    let finished: Vec<&Path> = reports.iter().map(|r| r.path.as_path()).collect();
                    parser::discard_reports(&finished);
                    return Err(e);
                }
            }
        }

        Ok(reports)
    }

    async fn transform(&self, reports: Vec<ReportFile>) -> Result<ScanResults> {
        for report in &reports {
            tracing::debug!(
                "Parsing {} report {} for [{}]",
                report.group,
                report.path.display(),
                report.targets.join(", ")
            );
        }
        let paths: Vec<PathBuf> = reports.into_iter().map(|r| r.path).collect();
        parser::parse_reports(&paths)
    }

    async fn load(&self, results: ScanResults) -> Result<String> {
        {
            let mut stdout = std::io::stdout().lock();
            write_console(&results, &mut stdout)?;
        }

        if let Some(json_path) = self.config.json_report() {
            let written = json::write_json(&self.storage, json_path, &results).await?;
            tracing::info!("Generated JSON report \"{}\"", written);
        }

        html::write_html(&self.storage, self.config.html_report(), &results).await
    }
}
