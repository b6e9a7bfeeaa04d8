use crate::domain::model::TargetGroup;
use crate::domain::ports::{ConfigProvider, LineSink};
use crate::utils::error::{Result, ScanError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)About ([0-9]+(?:\.[0-9]+)?)% done;").expect("progress pattern is valid")
});

/// Scan modes toggled from the command line or the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanOptions {
    pub fast: bool,
    pub stealth: bool,
    pub aggressive: bool,
    pub version_detection: bool,
}

impl ScanOptions {
    /// Mode flags in the order they are passed to the scanner.
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.version_detection {
            flags.push("-sV");
        }
        if self.fast {
            flags.push("-F");
        }
        if self.stealth {
            flags.push("-sS");
        }
        if self.aggressive {
            flags.push("-T4");
        }
        flags
    }

    pub fn merge(&self, other: &ScanOptions) -> ScanOptions {
        ScanOptions {
            fast: self.fast || other.fast,
            stealth: self.stealth || other.stealth,
            aggressive: self.aggressive || other.aggressive,
            version_detection: self.version_detection || other.version_detection,
        }
    }
}

/// Full argument list for one scanner run, targets last.
pub fn build_args(
    stats_every: &str,
    output: &Path,
    options: &ScanOptions,
    group: TargetGroup,
    targets: &[String],
) -> Vec<String> {
    let mut args = vec![
        "--stats-every".to_string(),
        stats_every.to_string(),
        "-oX".to_string(),
        output.display().to_string(),
        "-Pn".to_string(),
        "-n".to_string(),
    ];
    args.extend(options.flags().into_iter().map(String::from));
    if group == TargetGroup::Ipv6 {
        args.push("-6".to_string());
    }
    args.extend(targets.iter().cloned());
    args
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub percent: f32,
    pub message: String,
}

/// Extracts the completion percentage from a scanner status line.
pub fn parse_progress(line: &str) -> Option<Progress> {
    let caps = PROGRESS_LINE.captures(line)?;
    let percent = caps[1].parse::<f32>().ok()?;
    let end = line.rfind(';').unwrap_or(line.len());
    Some(Progress {
        percent,
        message: line[..end].trim().to_string(),
    })
}

/// Logs a progress message for every status line of one scanner run.
#[derive(Debug)]
pub struct ProgressSink {
    label: String,
    last_percent: Option<f32>,
    last_message: Option<String>,
    updates: usize,
}

impl ProgressSink {
    pub fn new(targets: &[String]) -> Self {
        Self {
            label: format!("[{}]", targets.join(", ")),
            last_percent: None,
            last_message: None,
            updates: 0,
        }
    }

    pub fn last_percent(&self) -> Option<f32> {
        self.last_percent
    }

    /// The most recent message logged, e.g. `"... About 10.00% done for [10.0.0.1]"`.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl LineSink for ProgressSink {
    fn on_line(&mut self, line: &str) {
        if let Some(progress) = parse_progress(line) {
            let message = format!("{} for {}", progress.message, self.label);
            tracing::info!("{}", message);
            self.last_percent = Some(progress.percent);
            self.last_message = Some(message);
            self.updates += 1;
        }
    }
}

/// Runs the external scanner once per target group.
pub struct ScanInvoker<'a> {
    binary: &'a str,
    stats_every: &'a str,
    options: &'a ScanOptions,
}

impl<'a> ScanInvoker<'a> {
    pub fn new(binary: &'a str, stats_every: &'a str, options: &'a ScanOptions) -> Self {
        Self {
            binary,
            stats_every,
            options,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &'a C) -> Self {
        Self::new(config.binary(), config.stats_every(), config.options())
    }

    /// Scans `targets` and returns the path of the XML report, or `None` for an
    /// empty group. Blocks (asynchronously) until the scanner exits.
    pub async fn scan<S: LineSink>(
        &self,
        targets: &[String],
        group: TargetGroup,
        sink: &mut S,
    ) -> Result<Option<PathBuf>> {
        if targets.is_empty() {
            tracing::debug!("No {} targets, skipping scanner run", group);
            return Ok(None);
        }

        let report = tempfile::Builder::new()
            .prefix("nmap-")
            .suffix("-scan.xml")
            .tempfile()?
            .into_temp_path()
            .keep()
            .map_err(|e| e.error)?;

        let args = build_args(self.stats_every, &report, self.options, group, targets);
        tracing::debug!("Running {} {}", self.binary, args.join(" "));

        let mut child = match Command::new(self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let _ = std::fs::remove_file(&report);
                return Err(e.into());
            }
        };

        let status = match stream_lines(&mut child, sink).await {
            Ok(()) => child.wait().await,
            Err(e) => Err(e),
        };
        let status = match status {
            Ok(status) => status,
            Err(e) => {
                let _ = std::fs::remove_file(&report);
                return Err(e.into());
            }
        };
        if !status.success() {
            return Err(ScanError::ScannerFailed {
                code: status.code(),
                report,
            });
        }

        tracing::debug!("Scanner finished, report at {}", report.display());
        Ok(Some(report))
    }
}

async fn stream_lines<S: LineSink>(child: &mut Child, sink: &mut S) -> std::io::Result<()> {
    let Some(stdout) = child.stdout.take() else {
        return Ok(());
    };
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        sink.on_line(line.trim_end_matches(['\r', '\n']));
    }
}

/// Locates the scanner executable, either at an explicit path or on `PATH`.
pub fn verify_system(binary: &str) -> Result<PathBuf> {
    let not_found = || ScanError::ScannerNotFound {
        binary: binary.to_string(),
    };

    let candidate = Path::new(binary);
    if candidate.is_absolute() || candidate.components().count() > 1 {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(not_found())
        };
    }
    if binary.is_empty() {
        return Err(not_found());
    }

    let path_var = std::env::var_os("PATH").ok_or_else(not_found)?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(binary))
        .find(|path| is_executable(path))
        .ok_or_else(not_found)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
