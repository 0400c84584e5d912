use serde::{Deserialize, Serialize};

/// Deployment settings shared by every tenant in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tenants_dir: String,
    pub image: String,
    pub container_prefix: String,
    pub volume_suffix: String,
    pub service_port: u16,
    pub files_mount: String,
    pub config_mount: String,
    pub data_mount: String,
    pub restart_policy: String,
    pub run_as_invoking_user: bool,
    pub extra_run_args: Option<String>,
    pub pull_missing_image: bool,
    pub grace_period_secs: u64,
    pub credential_timeout_secs: Option<u64>,
    pub credential_poll_interval_ms: u64,
    pub username: String,
    pub public_host: String,
    pub docker_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tenants_dir: "tenants".to_string(),
            image: "filebrowser/filebrowser".to_string(),
            container_prefix: "files_".to_string(),
            volume_suffix: "_settings_vol".to_string(),
            service_port: 80,
            files_mount: "/srv".to_string(),
            config_mount: "/config".to_string(),
            data_mount: "/database".to_string(),
            restart_policy: "unless-stopped".to_string(),
            run_as_invoking_user: false,
            extra_run_args: None,
            pull_missing_image: true,
            grace_period_secs: 5,
            credential_timeout_secs: None,
            credential_poll_interval_ms: 500,
            username: "admin".to_string(),
            public_host: "localhost".to_string(),
            docker_timeout: 300,
        }
    }
}

impl Config {
    /// Runtime instance name for a tenant.
    pub fn container_name(&self, tenant: &str) -> String {
        format!("{}{}", self.container_prefix, tenant)
    }

    /// Persistent volume name for a tenant. The volume outlives every run.
    pub fn volume_name(&self, tenant: &str) -> String {
        format!("{}{}", tenant, self.volume_suffix)
    }

    pub fn tenant_url(&self, port: u16) -> String {
        format!("http://{}:{}", self.public_host, port)
    }
}
