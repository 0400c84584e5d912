use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::credential::ScrapePolicy;

/// Input to a deployment batch.
pub struct BatchInput {
    pub config: Config,
    pub names: Vec<String>,
    pub start_port: u16,
    /// Directory the tenant workspaces are created under.
    pub base_dir: PathBuf,
    pub scrape: ScrapePolicy,
}

/// Which step a tenant failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Provision,
    Port,
    Deploy,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Provision => "provision",
            Stage::Port => "port",
            Stage::Deploy => "deploy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TenantOutcome {
    Ready {
        url: String,
        username: String,
        password: String,
        container: String,
    },
    /// Instance is up but no credential was observed.
    CredentialMissing {
        url: String,
        username: String,
        container: String,
        volume: String,
        timed_out: bool,
    },
    Failed {
        stage: Stage,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantReport {
    pub name: String,
    pub port: Option<u16>,
    #[serde(flatten)]
    pub outcome: TenantOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub ready: usize,
    pub warned: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub tenants: Vec<TenantReport>,
    pub summary: Summary,
}

/// Events emitted while the batch runs, in order.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    TenantStarted { name: &'a str, port: Option<u16> },
    TenantFinished(&'a TenantReport),
}
