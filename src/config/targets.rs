use crate::utils::error::Result;
use std::path::Path;

/// One target per line; blank lines and `#` comments are skipped.
pub fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

pub fn read_targets_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(&path)?;
    let targets = parse_targets(&content);
    tracing::debug!(
        "Loaded {} targets from {}",
        targets.len(),
        path.as_ref().display()
    );
    Ok(targets)
}
