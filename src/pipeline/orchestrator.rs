use crate::credential::CredentialOutcome;
use crate::docker::Engine;
use crate::lifecycle;
use crate::ports::PortAllocator;
use crate::workspace;

use super::types::{
    BatchEvent, BatchInput, BatchReport, Stage, Summary, TenantOutcome, TenantReport,
};

/// Deploy every tenant in `input.names`, strictly one after another.
///
/// A tenant's failure never stops the batch. Each tenant consumes the next
/// port in input order whether or not it gets far enough to use it, so the
/// `i`-th name always maps to `start_port + i`.
pub fn run_batch(
    engine: &dyn Engine,
    input: &BatchInput,
    mut on_event: impl FnMut(BatchEvent<'_>),
) -> BatchReport {
    let mut ports = PortAllocator::new(input.start_port);
    let mut report = BatchReport::default();

    for name in &input.names {
        let port = ports.allocate();
        on_event(BatchEvent::TenantStarted { name, port });

        let outcome = match port {
            Some(port) => deploy_one(engine, input, name, port),
            None => TenantOutcome::Failed {
                stage: Stage::Port,
                error: "host port range exhausted".into(),
            },
        };

        tally(&mut report.summary, &outcome);
        let tenant = TenantReport {
            name: name.clone(),
            port,
            outcome,
        };
        on_event(BatchEvent::TenantFinished(&tenant));
        report.tenants.push(tenant);
    }

    report
}

fn deploy_one(engine: &dyn Engine, input: &BatchInput, name: &str, port: u16) -> TenantOutcome {
    let cfg = &input.config;

    let ws = match workspace::provision(&input.base_dir, name) {
        Ok(ws) => ws,
        Err(e) => {
            tracing::error!(tenant = name, error = %error_chain(&e), "workspace provisioning failed");
            return TenantOutcome::Failed {
                stage: Stage::Provision,
                error: error_chain(&e),
            };
        }
    };

    let deployment = match lifecycle::deploy(engine, cfg, name, port, &ws, input.scrape) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(tenant = name, port, error = %error_chain(&e), "deploy failed");
            return TenantOutcome::Failed {
                stage: Stage::Deploy,
                error: error_chain(&e),
            };
        }
    };

    let url = cfg.tenant_url(port);
    match deployment.credential {
        CredentialOutcome::Found(password) => TenantOutcome::Ready {
            url,
            username: cfg.username.clone(),
            password,
            container: deployment.container,
        },
        missing => {
            tracing::warn!(
                tenant = name,
                volume = %deployment.volume,
                "credential not found in instance log"
            );
            TenantOutcome::CredentialMissing {
                url,
                username: cfg.username.clone(),
                container: deployment.container,
                volume: deployment.volume,
                timed_out: missing == CredentialOutcome::TimedOut,
            }
        }
    }
}

fn tally(summary: &mut Summary, outcome: &TenantOutcome) {
    summary.total += 1;
    match outcome {
        TenantOutcome::Ready { .. } => summary.ready += 1,
        TenantOutcome::CredentialMissing { .. } => summary.warned += 1,
        TenantOutcome::Failed { .. } => summary.failed += 1,
    }
}

/// `outer: inner: root` rendering of an error and its sources.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DockerError, LifecycleError};

    #[test]
    fn error_chain_includes_sources() {
        let err = LifecycleError::Start {
            name: "files_a".into(),
            source: DockerError::Failed {
                command: "run".into(),
                code: Some(125),
                stderr: "port is already allocated".into(),
            },
        };
        let msg = error_chain(&err);
        assert!(msg.starts_with("failed to start instance files_a: "));
        assert!(msg.ends_with("port is already allocated"));
    }

    #[test]
    fn tally_counts_each_kind() {
        let mut summary = Summary::default();
        tally(
            &mut summary,
            &TenantOutcome::Failed {
                stage: Stage::Deploy,
                error: "x".into(),
            },
        );
        tally(
            &mut summary,
            &TenantOutcome::CredentialMissing {
                url: "u".into(),
                username: "admin".into(),
                container: "files_a".into(),
                volume: "a_settings_vol".into(),
                timed_out: false,
            },
        );
        assert_eq!(
            summary,
            Summary {
                total: 2,
                ready: 0,
                warned: 1,
                failed: 1
            }
        );
    }
}
