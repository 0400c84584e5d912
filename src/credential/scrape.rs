use std::time::{Duration, Instant};

use crate::config::Config;
use crate::docker::Engine;
use crate::docker::run::POLL_INTERVAL;
use crate::error::LifecycleError;

use super::{CredentialOutcome, extract_password};

/// How long to wait before reading the log, and whether to keep re-reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapePolicy {
    pub grace: Duration,
    /// `None` takes a single snapshot after `grace`.
    pub timeout: Option<Duration>,
    /// Clamped to at least [`POLL_INTERVAL`].
    pub poll_interval: Duration,
}

impl ScrapePolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            grace: Duration::from_secs(cfg.grace_period_secs),
            timeout: cfg.credential_timeout_secs.map(Duration::from_secs),
            poll_interval: Duration::from_millis(cfg.credential_poll_interval_ms),
        }
    }

    /// Single snapshot with no wait.
    pub fn immediate() -> Self {
        Self {
            grace: Duration::ZERO,
            timeout: None,
            poll_interval: Duration::ZERO,
        }
    }
}

/// Wait out the grace period, then look for the generated credential in the
/// instance's log. Blocks the calling thread for the whole wait.
pub fn scrape(
    engine: &dyn Engine,
    container: &str,
    policy: ScrapePolicy,
) -> Result<CredentialOutcome, LifecycleError> {
    if !policy.grace.is_zero() {
        tracing::info!(
            container,
            grace_secs = policy.grace.as_secs_f32(),
            "waiting for first-boot log"
        );
        std::thread::sleep(policy.grace);
    }

    let read = || {
        engine.logs(container).map_err(|source| LifecycleError::Logs {
            name: container.to_string(),
            source,
        })
    };

    let Some(timeout) = policy.timeout else {
        let log = read()?;
        return Ok(match extract_password(&log) {
            Some(token) => CredentialOutcome::Found(token.to_string()),
            None => CredentialOutcome::NotFound,
        });
    };

    // A timeout past the clock's range means no deadline at all.
    let deadline = Instant::now().checked_add(timeout);
    let interval = policy.poll_interval.max(POLL_INTERVAL);
    loop {
        let log = read()?;
        if let Some(token) = extract_password(&log) {
            return Ok(CredentialOutcome::Found(token.to_string()));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(CredentialOutcome::TimedOut);
        }
        tracing::debug!(container, "credential not logged yet");
        std::thread::sleep(interval);
    }
}
