//! Container lifecycle: keep exactly one running instance per tenant.
//!
//! A deploy makes sure the persistent volume and image exist, removes any
//! stale instance with the tenant's name, starts a fresh detached instance and
//! hands its log to the credential scraper. The persistent volume is never
//! removed.

mod state;

pub use state::InstanceState;

use crate::config::Config;
use crate::credential::{self, CredentialOutcome, ScrapePolicy};
use crate::docker::{self, Bind, Engine, RunSpec};
use crate::error::LifecycleError;
use crate::workspace::Workspace;

/// Result of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub container: String,
    pub container_id: String,
    pub volume: String,
    pub port: u16,
    pub replaced: bool,
    pub credential: CredentialOutcome,
}

/// One tenant's runtime instance, tracked through the replace cycle.
pub struct Instance<'e> {
    engine: &'e dyn Engine,
    name: String,
    state: InstanceState,
}

impl<'e> Instance<'e> {
    /// Look the instance up on the engine. A failed lookup counts as absent.
    pub fn lookup(engine: &'e dyn Engine, name: impl Into<String>) -> Self {
        let name = name.into();
        let state = match engine.inspect_container(&name) {
            Ok(found) => InstanceState::observed(found.as_ref()),
            Err(e) => {
                tracing::debug!(container = %name, error = %e, "lookup failed, treating as absent");
                InstanceState::Absent
            }
        };
        Self {
            engine,
            name,
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &InstanceState {
        &self.state
    }

    fn transition(&mut self, next: InstanceState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!(container = %self.name, from = %self.state, to = %next, "instance transition");
        self.state = next;
    }

    /// Stop (if running) and remove whatever is there. No-op when absent.
    pub fn clear(&mut self) -> Result<bool, LifecycleError> {
        if !self.state.is_present() {
            return Ok(false);
        }
        tracing::info!(container = %self.name, "removing old container");

        if self.state == InstanceState::Running {
            self.transition(InstanceState::Stopping);
            self.engine
                .stop_container(&self.name)
                .map_err(|source| LifecycleError::Stop {
                    name: self.name.clone(),
                    source,
                })?;
            self.transition(InstanceState::Exited("exited".into()));
        }

        self.engine
            .remove_container(&self.name)
            .map_err(|source| LifecycleError::Remove {
                name: self.name.clone(),
                source,
            })?;
        self.transition(InstanceState::Removed);
        Ok(true)
    }

    /// Start a fresh instance. Must be cleared first.
    pub fn start(&mut self, spec: &RunSpec) -> Result<String, LifecycleError> {
        self.transition(InstanceState::Starting);
        let id = self
            .engine
            .run_detached(spec)
            .map_err(|source| LifecycleError::Start {
                name: self.name.clone(),
                source,
            })?;
        self.transition(InstanceState::Running);
        Ok(id)
    }
}

/// Build the `docker run` description for a tenant.
pub fn run_spec(
    cfg: &Config,
    tenant: &str,
    port: u16,
    ws: &Workspace,
) -> Result<RunSpec, LifecycleError> {
    let mut extra_args = Vec::new();
    if cfg.run_as_invoking_user {
        extra_args.extend(docker::user_args());
    }
    if let Some(raw) = &cfg.extra_run_args {
        let parsed = shell_words::split(raw).map_err(|e| LifecycleError::RunArgs(e.to_string()))?;
        extra_args.extend(parsed);
    }

    Ok(RunSpec {
        name: cfg.container_name(tenant),
        image: cfg.image.clone(),
        host_port: port,
        container_port: cfg.service_port,
        binds: vec![
            Bind::rw(ws.files.display().to_string(), &cfg.files_mount),
            Bind::rw(cfg.volume_name(tenant), &cfg.data_mount),
            Bind::rw(ws.config.display().to_string(), &cfg.config_mount),
        ],
        restart_policy: cfg.restart_policy.clone(),
        extra_args,
    })
}

fn ensure_volume(engine: &dyn Engine, name: &str) -> Result<(), LifecycleError> {
    let err = |source| LifecycleError::Volume {
        name: name.to_string(),
        source,
    };
    if engine.volume_exists(name).map_err(err)? {
        tracing::debug!(volume = name, "reusing existing volume");
        return Ok(());
    }
    tracing::info!(volume = name, "creating volume");
    engine.create_volume(name).map_err(err)
}

fn ensure_image(engine: &dyn Engine, cfg: &Config) -> Result<(), LifecycleError> {
    let err = |source| LifecycleError::Image {
        image: cfg.image.clone(),
        source,
    };
    if engine.image_exists(&cfg.image).map_err(err)? {
        return Ok(());
    }
    if !cfg.pull_missing_image {
        return Err(LifecycleError::ImageMissing {
            image: cfg.image.clone(),
        });
    }
    tracing::info!(image = %cfg.image, "pulling image");
    engine.pull_image(&cfg.image).map_err(err)
}

/// Replace the tenant's instance and scrape its credential.
pub fn deploy(
    engine: &dyn Engine,
    cfg: &Config,
    tenant: &str,
    port: u16,
    ws: &Workspace,
    policy: ScrapePolicy,
) -> Result<Deployment, LifecycleError> {
    let spec = run_spec(cfg, tenant, port, ws)?;
    let volume = cfg.volume_name(tenant);

    // Prerequisites first, so a failed pull leaves the old instance running.
    ensure_volume(engine, &volume)?;
    ensure_image(engine, cfg)?;

    let mut instance = Instance::lookup(engine, &spec.name);
    let replaced = instance.clear()?;

    tracing::info!(tenant, port, "starting instance");
    let container_id = instance.start(&spec)?;

    let credential = credential::scrape(engine, instance.name(), policy)?;

    Ok(Deployment {
        container: spec.name,
        container_id,
        volume,
        port,
        replaced,
        credential,
    })
}
