//! Link profile persistence
//!
//! Save/load/list/delete link profiles as JSON files in a caller-chosen
//! directory (the CLI uses the platform config directory).

use std::path::{Path, PathBuf};

use crate::domain::{LinkConfig, TuxError, TuxResult};

/// Ensure `base` exists and return it.
fn config_dir(base: &Path) -> TuxResult<PathBuf> {
    std::fs::create_dir_all(base)
        .map_err(|e| TuxError::Config(format!("Failed to create configs dir: {e}")))?;
    Ok(base.to_path_buf())
}

/// Sanitize a profile name to prevent path traversal.
/// Rejects anything with path separators, "..", or empty strings.
fn sanitize_name(name: &str) -> TuxResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TuxError::Config("Configuration name cannot be empty".to_string()));
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(TuxError::Config("Invalid configuration name".to_string()));
    }
    // Only allow alphanumeric, spaces, hyphens, underscores
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
    {
        return Err(TuxError::Config(
            "Configuration name contains invalid characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn save_configuration(base: &Path, config: &LinkConfig) -> TuxResult<()> {
    let name = sanitize_name(&config.name)?;
    let path = config_dir(base)?.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| TuxError::Config(format!("Serialization error: {e}")))?;
    std::fs::write(&path, json)
        .map_err(|e| TuxError::Config(format!("Failed to write config: {e}")))?;
    log::debug!("saved profile '{name}' to {}", path.display());
    Ok(())
}

pub fn load_configuration(base: &Path, name: &str) -> TuxResult<LinkConfig> {
    let name = sanitize_name(name)?;
    let path = config_dir(base)?.join(format!("{name}.json"));
    let json = std::fs::read_to_string(&path)
        .map_err(|e| TuxError::Config(format!("Failed to read config '{name}': {e}")))?;
    serde_json::from_str(&json)
        .map_err(|e| TuxError::Config(format!("Failed to parse config '{name}': {e}")))
}

pub fn list_configurations(base: &Path) -> TuxResult<Vec<String>> {
    let dir = config_dir(base)?;
    let mut names: Vec<String> = std::fs::read_dir(&dir)
        .map_err(|e| TuxError::Config(format!("Failed to read configs dir: {e}")))?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.extension()?.to_str()? == "json" {
                path.file_stem()?.to_str().map(String::from)
            } else {
                None
            }
        })
        .collect();
    names.sort();
    Ok(names)
}

pub fn delete_configuration(base: &Path, name: &str) -> TuxResult<()> {
    let name = sanitize_name(name)?;
    if name == "Default" {
        return Err(TuxError::Config(
            "Cannot delete the Default configuration".to_string(),
        ));
    }
    let path = config_dir(base)?.join(format!("{name}.json"));
    if !path.exists() {
        return Err(TuxError::Config(format!("Configuration '{name}' not found")));
    }
    std::fs::remove_file(&path)
        .map_err(|e| TuxError::Config(format!("Failed to delete config '{name}': {e}")))
}
