use anyhow::{Context, Result};
use blockforge_common::EditorConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "blockforge.config.json";

/// Load the editor config.
///
/// An explicit path must exist; otherwise `blockforge.config.json` in `cwd`
/// is used when present, falling back to defaults.
pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<EditorConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
            if !default.exists() {
                return Ok(EditorConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config {}", config_path.display()))?;
    let config: EditorConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid config {}", config_path.display()))?;
    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}
