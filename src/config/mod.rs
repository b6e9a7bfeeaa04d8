#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod targets;
pub mod toml_config;

use crate::core::invoker::ScanOptions;
use crate::core::ConfigProvider;
use crate::report::html::DEFAULT_HTML_REPORT;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_distinct_paths, validate_non_empty_string, validate_path, validate_time_spec,
    Validate,
};
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

pub const DEFAULT_SCANNER: &str = "nmap";
pub const DEFAULT_STATS_EVERY: &str = "0.5";

/// The resolved settings for one run, built once and handed to every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub binary: String,
    pub stats_every: String,
    pub options: ScanOptions,
    pub targets: Vec<String>,
    pub html_report: String,
    pub json_report: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            binary: DEFAULT_SCANNER.to_string(),
            stats_every: DEFAULT_STATS_EVERY.to_string(),
            options: ScanOptions::default(),
            targets: Vec::new(),
            html_report: DEFAULT_HTML_REPORT.to_string(),
            json_report: None,
        }
    }
}

impl ScanConfig {
    pub fn with_targets<I, T>(targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Layers a config file over the current values. Mode flags OR together.
    pub fn apply_file(&mut self, file: &TomlConfig) {
        if let Some(binary) = &file.scanner.binary {
            self.binary = binary.clone();
        }
        if let Some(stats_every) = &file.scanner.stats_every {
            self.stats_every = stats_every.clone();
        }
        if let Some(html) = &file.report.html {
            self.html_report = html.clone();
        }
        if file.report.json.is_some() {
            self.json_report = file.report.json.clone();
        }
        if !file.targets.is_empty() {
            self.targets = file.targets.clone();
        }
        self.options = self.options.merge(&file.options);
    }
}

impl ConfigProvider for ScanConfig {
    fn binary(&self) -> &str {
        &self.binary
    }

    fn stats_every(&self) -> &str {
        &self.stats_every
    }

    fn options(&self) -> &ScanOptions {
        &self.options
    }

    fn targets(&self) -> &[String] {
        &self.targets
    }

    fn html_report(&self) -> &str {
        &self.html_report
    }

    fn json_report(&self) -> Option<&str> {
        self.json_report.as_deref()
    }
}

impl Validate for ScanConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("scanner.binary", &self.binary)?;
        validate_time_spec("scanner.stats_every", &self.stats_every)?;
        validate_path("report.html", &self.html_report)?;
        if let Some(json) = &self.json_report {
            validate_path("report.json", json)?;
            validate_distinct_paths("report.json", &self.html_report, json)?;
        }
        for target in &self.targets {
            validate_non_empty_string("targets", target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ScanConfig::with_targets(["10.0.0.1"]);
        assert_eq!(config.binary, "nmap");
        assert_eq!(config.stats_every, "0.5");
        assert_eq!(config.html_report, "scan-report.html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_file_overrides_and_merges() {
        let file = TomlConfig::from_toml_str(
            "[scanner]\nbinary = \"/opt/nmap\"\n[options]\nstealth = true\n[report]\njson = \"out.json\"\n",
        )
        .unwrap();
        let mut config = ScanConfig::with_targets(["10.0.0.1"]);
        config.options.fast = true;

        config.apply_file(&file);

        assert_eq!(config.binary, "/opt/nmap");
        assert_eq!(config.stats_every, "0.5");
        assert!(config.options.fast);
        assert!(config.options.stealth);
        assert_eq!(config.json_report(), Some("out.json"));
        assert_eq!(config.targets(), &["10.0.0.1".to_string()]);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let mut config = ScanConfig::default();
        config.stats_every = "soon".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_html_and_json_path_rejected() {
        let mut config = ScanConfig::default();
        config.json_report = Some(config.html_report.clone());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_target_rejected() {
        let config = ScanConfig::with_targets(["10.0.0.1", "   "]);
        assert!(config.validate().is_err());
    }
}
