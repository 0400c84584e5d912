//! Per-tenant directory layout: `<base>/<tenant>/files` and `<base>/<tenant>/config`.

use std::path::{Path, PathBuf};

use crate::error::ProvisionError;

/// Absolute paths of one tenant's workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub root: PathBuf,
    pub files: PathBuf,
    pub config: PathBuf,
}

impl Workspace {
    /// Compute the layout for `tenant` under `base` without touching disk.
    /// Relative bases are resolved against the process working directory.
    pub fn layout(base: &Path, tenant: &str) -> Result<Self, ProvisionError> {
        let base = std::path::absolute(base).map_err(|source| ProvisionError::Resolve {
            path: base.to_path_buf(),
            source,
        })?;
        let root = base.join(tenant);
        Ok(Self {
            files: root.join("files"),
            config: root.join("config"),
            root,
        })
    }
}

/// Create the tenant's workspace, parents included. Existing directories are
/// left as they are; nothing is cleaned up on failure.
pub fn provision(base: &Path, tenant: &str) -> Result<Workspace, ProvisionError> {
    let ws = Workspace::layout(base, tenant)?;
    for dir in [&ws.files, &ws.config] {
        std::fs::create_dir_all(dir).map_err(|source| ProvisionError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }
    tracing::debug!(tenant, root = %ws.root.display(), "workspace ready");
    Ok(ws)
}
