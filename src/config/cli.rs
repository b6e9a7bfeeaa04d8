use crate::config::targets::read_targets_file;
use crate::config::toml_config::TomlConfig;
use crate::config::ScanConfig;
use crate::core::invoker::ScanOptions;
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

const EXAMPLES: &str = "Examples:
  nmap-report 93.184.216.34 example.com 2606:2800:220:1:248:1893:25c8:1946 172.16.36.12/28
  nmap-report --fast example.com
  nmap-report --aggressive 93.184.216.34/32
  sudo nmap-report --stealth 172.16.36.12/28
  nmap-report --file targets.txt --json scan-report.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "nmap-report")]
#[command(about = "TCP scan a list of targets given as ipv4, ipv6 or hostnames")]
#[command(after_help = EXAMPLES)]
pub struct CliConfig {
    /// Targets to scan; any of ipv4, ipv6, CIDR block or hostname
    pub targets: Vec<String>,

    /// File of targets, one per line; replaces the positional targets
    #[arg(short = 'f', long)]
    pub file: Option<String>,

    /// Fast mode - scan fewer ports than the default scan
    #[arg(short = 'F', long)]
    pub fast: bool,

    /// Stealth mode - TCP SYN scan, requires root
    #[arg(short = 'S', long)]
    pub stealth: bool,

    /// Aggressive timing, for networks that tolerate it
    #[arg(short = 'A', long)]
    pub aggressive: bool,

    /// Enable service product/version detection (slower)
    #[arg(short = 'V', long)]
    pub port_versioning: bool,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Scanner executable name or path
    #[arg(long)]
    pub nmap: Option<String>,

    /// Interval between scanner progress reports (nmap time syntax)
    #[arg(long)]
    pub stats_every: Option<String>,

    /// Where to write the HTML report
    #[arg(long)]
    pub html: Option<String>,

    /// Also write a JSON report to this path
    #[arg(long)]
    pub json: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl CliConfig {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            fast: self.fast,
            stealth: self.stealth,
            aggressive: self.aggressive,
            version_detection: self.port_versioning,
        }
    }

    /// Builds the run configuration: defaults, then the config file, then the
    /// command line.
    pub fn resolve(&self) -> Result<ScanConfig> {
        let mut config = ScanConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration from {}", path);
            config.apply_file(&TomlConfig::from_file(path)?);
        }

        if let Some(path) = &self.file {
            config.targets = read_targets_file(path)?;
        } else if !self.targets.is_empty() {
            config.targets = self.targets.clone();
        }

        config.options = config.options.merge(&self.scan_options());

        if let Some(binary) = &self.nmap {
            config.binary = binary.clone();
        }
        if let Some(stats_every) = &self.stats_every {
            config.stats_every = stats_every.clone();
        }
        if let Some(html) = &self.html {
            config.html_report = html.clone();
        }
        if self.json.is_some() {
            config.json_report = self.json.clone();
        }

        Ok(config)
    }
}
