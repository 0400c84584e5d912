mod loader;
mod types;

use std::path::Path;

use anyhow::Result;

pub use loader::{CONFIG_FILE, load_file};
pub use types::Config;

/// Resolve the effective config: an explicit file wins, then `.tenantrc`
/// in `cwd`, then defaults.
pub fn load(cwd: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_file(path);
    }
    Ok(loader::load_from_dir(cwd)?.unwrap_or_default())
}
