//! Settings file loading

use super::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn load_settings(search_dir: &Path, settings_path: Option<&Path>) -> Result<Settings> {
    let path_provided = settings_path.is_some();

    let discovered = match settings_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_settings(search_dir),
    };

    let Some(settings_file) = discovered else {
        return Ok(Settings::default());
    };

    let content = fs::read_to_string(&settings_file)
        .with_context(|| format!("Failed reading settings file: {}", settings_file.display()))?;

    let ext = settings_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_settings(&content, &settings_file),
        "yaml" | "yml" => parse_yaml_settings(&content, &settings_file),
        other => Err(anyhow::anyhow!(
            "Unsupported settings extension '.{}' for file {}",
            other,
            settings_file.display()
        )),
    };

    match parsed {
        Ok(settings) => Ok(settings),
        Err(e) if path_provided => Err(e),
        Err(e) => {
            // Auto-discovered: warn and fall back to defaults
            tracing::warn!(
                "Failed to parse auto-discovered settings {}: {:#}",
                settings_file.display(),
                e
            );
            Ok(Settings::default())
        }
    }
}

/// Parse TOML settings, accepting either top-level keys or an `[include-one]` table.
fn parse_toml_settings(content: &str, settings_file: &Path) -> Result<Settings> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", settings_file.display()))?;

    let value = match raw.get("include-one") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    value.try_into().with_context(|| format!("Invalid TOML settings: {}", settings_file.display()))
}

/// Parse YAML settings, accepting either top-level keys or an `include-one` mapping.
fn parse_yaml_settings(content: &str, settings_file: &Path) -> Result<Settings> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", settings_file.display()))?;

    // An empty document deserializes as null.
    let value = match raw.get("include-one") {
        Some(nested) => nested.clone(),
        None if raw.is_null() => return Ok(Settings::default()),
        None => raw,
    };

    serde_yaml::from_value(value)
        .with_context(|| format!("Invalid YAML settings: {}", settings_file.display()))
}

fn discover_settings(search_dir: &Path) -> Option<PathBuf> {
    let candidates = ["include-one.toml", ".include-one.toml", "include-one.yaml", "include-one.yml"];

    candidates.iter().map(|candidate| search_dir.join(candidate)).find(|path| path.exists())
}
