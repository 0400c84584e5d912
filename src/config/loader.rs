use std::path::Path;

use anyhow::{Context, Result};

use super::types::Config;

pub const CONFIG_FILE: &str = ".tenantrc";

/// Load config from a `.tenantrc` file in the given directory.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_from_dir(dir: &Path) -> Result<Option<Config>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_file(&path).map(Some)
}

/// Load config from an explicit YAML file.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}
