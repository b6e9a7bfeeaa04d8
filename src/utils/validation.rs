use crate::utils::error::{Result, ScanError};
use regex::Regex;
use std::sync::LazyLock;

// nmap time syntax: a number with an optional ms/s/m/h unit.
static TIME_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+)?(ms|s|m|h)?$").expect("time spec pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ScanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ScanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_time_spec(field_name: &str, value: &str) -> Result<()> {
    if !TIME_SPEC.is_match(value) {
        return Err(ScanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a number with an optional ms, s, m or h suffix".to_string(),
        });
    }

    let number = value.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    match number.parse::<f64>() {
        Ok(n) if n > 0.0 => Ok(()),
        _ => Err(ScanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Interval must be greater than zero".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScanError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_distinct_paths(field_name: &str, first: &str, second: &str) -> Result<()> {
    if first == second {
        return Err(ScanError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("'{first}' is used for more than one report"),
        });
    }
    Ok(())
}
