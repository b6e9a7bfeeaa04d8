use crate::core::invoker::ScanOptions;
use crate::utils::error::{Result, ScanError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub scanner: ScannerSection,
    pub options: ScanOptions,
    pub report: ReportSection,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerSection {
    pub binary: Option<String>,
    pub stats_every: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub html: Option<String>,
    pub json: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScanError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NMAP_BIN})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
targets = ["10.0.0.1", "example.com"]

[scanner]
binary = "/usr/local/bin/nmap"
stats_every = "2s"

[options]
fast = true
version_detection = true

[report]
html = "reports/latest.html"
json = "reports/latest.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.scanner.binary.as_deref(), Some("/usr/local/bin/nmap"));
        assert_eq!(config.scanner.stats_every.as_deref(), Some("2s"));
        assert!(config.options.fast);
        assert!(!config.options.stealth);
        assert!(config.options.version_detection);
        assert_eq!(config.report.json.as_deref(), Some("reports/latest.json"));
        assert_eq!(config.targets, vec!["10.0.0.1", "example.com"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.scanner.binary.is_none());
        assert_eq!(config.options, ScanOptions::default());
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result = TomlConfig::from_toml_str("[options]\nturbo = true\n");
        assert!(matches!(result, Err(ScanError::ConfigError { .. })));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NMAP_REPORT_TEST_BINARY", "/opt/nmap/bin/nmap");

        let toml_content = r#"
[scanner]
binary = "${NMAP_REPORT_TEST_BINARY}"
stats_every = "${NMAP_REPORT_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.scanner.binary.as_deref(), Some("/opt/nmap/bin/nmap"));
        assert_eq!(
            config.scanner.stats_every.as_deref(),
            Some("${NMAP_REPORT_TEST_UNSET_VAR}")
        );

        std::env::remove_var("NMAP_REPORT_TEST_BINARY");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[report]\nhtml = \"custom.html\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.html.as_deref(), Some("custom.html"));
    }
}
