//! `.env` file loading (KEY=VALUE lines).
//!
//! Variables already present in the process environment are never
//! overwritten.

use std::path::{Path, PathBuf};

/// Default places to look for a `.env` file, most specific first.
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(".env"));
        }
    }
    candidates
}

/// Parse `.env` contents into key/value pairs.
///
/// Blank lines and `#` comments are skipped; surrounding quotes on the
/// value are stripped.
pub fn parse(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Apply the first readable file among `candidates`.
///
/// Returns the path that was applied, if any.
pub fn load_first(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            apply(&contents);
            tracing::debug!("loaded environment from {}", path.display());
            return Some(path.clone());
        }
    }
    None
}

/// Apply a single `.env` file.
pub fn load_path(path: &Path) -> std::io::Result<()> {
    let contents = std::fs::read_to_string(path)?;
    apply(&contents);
    Ok(())
}

fn apply(contents: &str) {
    for (key, value) in parse(contents) {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(key, value);
        }
    }
}
