// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Split a comma separated skill string into trimmed, non-empty tokens
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Trim skill tokens and drop blanks, keeping the given order
pub fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Case-insensitive place comparison ignoring surrounding whitespace; a blank place never matches
pub fn same_place(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.to_lowercase() == b.to_lowercase()
}

/// Convert a user supplied radius in kilometres into metres
pub fn radius_km_to_meters(radius_km: f64) -> Result<f64> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        anyhow::bail!("Radius must be a non-negative number of kilometres: {}", radius_km);
    }
    Ok(radius_km * 1000.0)
}

/// Ensure directory exists
pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

pub async fn read_file_safe(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
