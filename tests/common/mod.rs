//! In-memory engine that mimics the parts of docker the deployer relies on.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Duration;

use tenant_deploy::config::Config;
use tenant_deploy::credential::ScrapePolicy;
use tenant_deploy::docker::{ContainerState, Engine, RunSpec};
use tenant_deploy::error::DockerError;
use tenant_deploy::pipeline::BatchInput;

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub running: bool,
    pub host_port: u16,
    pub log: String,
}

#[derive(Default)]
pub struct FakeEngine {
    pub containers: RefCell<BTreeMap<String, FakeContainer>>,
    /// Volumes that exist; `true` once the service has initialised them.
    pub volumes: RefCell<BTreeMap<String, bool>>,
    pub fail_run: RefCell<HashSet<String>>,
    pub calls: RefCell<Vec<String>>,
    next_id: Cell<u32>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_run_of(&self, container: &str) {
        self.fail_run.borrow_mut().insert(container.to_string());
    }

    pub fn running_names(&self) -> BTreeSet<String> {
        self.containers
            .borrow()
            .iter()
            .filter(|(_, c)| c.running)
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn missing(what: &str, name: &str) -> DockerError {
        DockerError::Failed {
            command: what.to_string(),
            code: Some(1),
            stderr: format!("Error: No such container: {name}"),
        }
    }
}

impl Engine for FakeEngine {
    fn inspect_container(&self, name: &str) -> Result<Option<ContainerState>, DockerError> {
        self.record(format!("inspect {name}"));
        Ok(self.containers.borrow().get(name).map(|c| ContainerState {
            status: if c.running { "running" } else { "exited" }.to_string(),
            running: c.running,
        }))
    }

    fn stop_container(&self, name: &str) -> Result<(), DockerError> {
        self.record(format!("stop {name}"));
        match self.containers.borrow_mut().get_mut(name) {
            Some(c) => {
                c.running = false;
                Ok(())
            }
            None => Err(Self::missing("stop", name)),
        }
    }

    fn remove_container(&self, name: &str) -> Result<(), DockerError> {
        self.record(format!("rm {name}"));
        let mut containers = self.containers.borrow_mut();
        match containers.get(name).map(|c| c.running) {
            Some(true) => Err(DockerError::Failed {
                command: "rm".into(),
                code: Some(1),
                stderr: "cannot remove a running container".into(),
            }),
            Some(false) => {
                containers.remove(name);
                Ok(())
            }
            None => Err(Self::missing("rm", name)),
        }
    }

    fn volume_exists(&self, name: &str) -> Result<bool, DockerError> {
        Ok(self.volumes.borrow().contains_key(name))
    }

    fn create_volume(&self, name: &str) -> Result<(), DockerError> {
        self.record(format!("volume create {name}"));
        self.volumes.borrow_mut().insert(name.to_string(), false);
        Ok(())
    }

    fn image_exists(&self, _: &str) -> Result<bool, DockerError> {
        Ok(true)
    }

    fn pull_image(&self, image: &str) -> Result<(), DockerError> {
        self.record(format!("pull {image}"));
        Ok(())
    }

    fn run_detached(&self, spec: &RunSpec) -> Result<String, DockerError> {
        self.record(format!("run {} {}", spec.name, spec.host_port));
        if self.fail_run.borrow().contains(&spec.name) {
            return Err(DockerError::Failed {
                command: "run".into(),
                code: Some(125),
                stderr: "port is already allocated".into(),
            });
        }
        let mut containers = self.containers.borrow_mut();
        if containers.contains_key(&spec.name) {
            return Err(DockerError::Failed {
                command: "run".into(),
                code: Some(125),
                stderr: format!("Conflict. The container name \"/{}\" is already in use", spec.name),
            });
        }

        let mut log = String::from("Using config file: /config/settings.json\n");
        let mut volumes = self.volumes.borrow_mut();
        for bind in &spec.binds {
            if let Some(initialised) = volumes.get_mut(&bind.source)
                && !*initialised
            {
                *initialised = true;
                log.push_str(&format!(
                    "User 'admin' initialized with randomly generated password: pw-{}\n",
                    spec.name
                ));
            }
        }
        log.push_str("Listening on [::]:80\n");

        containers.insert(
            spec.name.clone(),
            FakeContainer {
                running: true,
                host_port: spec.host_port,
                log,
            },
        );
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        Ok(format!("{id:012x}"))
    }

    fn logs(&self, name: &str) -> Result<String, DockerError> {
        self.containers
            .borrow()
            .get(name)
            .map(|c| c.log.clone())
            .ok_or_else(|| Self::missing("logs", name))
    }
}

pub fn batch_input(base_dir: &std::path::Path, names: &[&str], start_port: u16) -> BatchInput {
    BatchInput {
        config: Config::default(),
        names: names.iter().map(|n| n.to_string()).collect(),
        start_port,
        base_dir: base_dir.to_path_buf(),
        scrape: ScrapePolicy {
            grace: Duration::ZERO,
            timeout: None,
            poll_interval: Duration::ZERO,
        },
    }
}
