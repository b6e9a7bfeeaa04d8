use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot find local {binary} executable. {binary} is required to run this program")]
    ScannerNotFound { binary: String },

    #[error("Scanner exited with status {code:?}; report left at {}", report.display())]
    ScannerFailed { code: Option<i32>, report: PathBuf },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Report {} is not well-formed XML: {source}", path.display())]
    XmlError {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Malformed report {}: {reason}", path.display())]
    MalformedReport { path: PathBuf, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Environment,
    Scanner,
    Report,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl ScanError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ScanError::MalformedReport {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScanError::ScannerNotFound { .. } => ErrorCategory::Environment,
            ScanError::ScannerFailed { .. } => ErrorCategory::Scanner,
            ScanError::XmlError { .. } | ScanError::MalformedReport { .. } => ErrorCategory::Report,
            ScanError::ConfigError { .. }
            | ScanError::ConfigValidationError { .. }
            | ScanError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScanError::IoError(_) | ScanError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Environment | ErrorCategory::System => ErrorSeverity::Critical,
            ErrorCategory::Scanner | ErrorCategory::Report | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScanError::ScannerNotFound { binary } => format!(
                "Install {binary} or point --nmap at the executable, then make sure it is on PATH"
            ),
            ScanError::ScannerFailed { report, .. } => format!(
                "Check the scanner diagnostics above; stealth mode needs root. Partial output: {}",
                report.display()
            ),
            ScanError::XmlError { path, .. } | ScanError::MalformedReport { path, .. } => format!(
                "The report was kept for inspection at {}",
                path.display()
            ),
            ScanError::IoError(_) => {
                "Check file permissions and free space in the working directory".to_string()
            }
            ScanError::SerializationError(_) => "Retry without --json".to_string(),
            ScanError::ConfigError { .. } => {
                "Check the TOML syntax of the configuration file".to_string()
            }
            ScanError::ConfigValidationError { field, .. }
            | ScanError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{field}' on the command line or in the config file")
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Environment => self.to_string(),
            ErrorCategory::Scanner => format!("Scan failed: {self}"),
            ErrorCategory::Report => format!("Could not read scan results: {self}"),
            ErrorCategory::Configuration => format!("Invalid configuration: {self}"),
            ErrorCategory::System => format!("System error: {self}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_scanner_is_critical() {
        let err = ScanError::ScannerNotFound {
            binary: "nmap".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Environment);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().starts_with("Cannot find local nmap executable"));
    }

    #[test]
    fn test_malformed_report_points_at_file() {
        let err = ScanError::malformed("/tmp/x-scan.xml", "port 80 has no <state>");
        assert_eq!(err.category(), ErrorCategory::Report);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("/tmp/x-scan.xml"));
        assert!(err.user_friendly_message().starts_with("Could not read scan results"));
    }
}
