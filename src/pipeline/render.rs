use std::fmt::Write;
use std::io::{self, Write as _};

use super::types::{BatchEvent, BatchReport, TenantOutcome, TenantReport};

/// Writes the human-readable progress to one stream and, when requested, the
/// JSON report to another. With JSON enabled the JSON stream carries nothing
/// else, so it stays machine-parseable.
pub struct Reporter<H, J> {
    human: H,
    json: Option<J>,
}

impl<H: io::Write, J: io::Write> Reporter<H, J> {
    pub fn new(human: H, json: Option<J>) -> Self {
        Self { human, json }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.human, "=== DEPLOYMENT START ===\n")
    }

    pub fn event(&mut self, event: &BatchEvent<'_>) -> io::Result<()> {
        match event {
            BatchEvent::TenantStarted { name, .. } => {
                writeln!(self.human, "{}", tenant_header(name))
            }
            BatchEvent::TenantFinished(tenant) => writeln!(self.human, "{}", tenant_block(tenant)),
        }
    }

    pub fn finish(&mut self, report: &BatchReport) -> io::Result<()> {
        writeln!(self.human, "{}", summary_line(report))?;
        self.human.flush()?;
        if let Some(json) = &mut self.json {
            serde_json::to_writer_pretty(&mut *json, report)?;
            writeln!(json)?;
            json.flush()?;
        }
        Ok(())
    }
}

pub fn tenant_header(name: &str) -> String {
    format!("--- Processing Tenant: {name} ---")
}

/// Human-readable status block for one tenant.
pub fn tenant_block(report: &TenantReport) -> String {
    let mut out = String::new();
    match &report.outcome {
        TenantOutcome::Ready {
            url,
            username,
            password,
            ..
        } => {
            let _ = writeln!(out, "[SUCCESS] Tenant: {}", report.name);
            let _ = writeln!(out, "  URL:  {url}");
            let _ = writeln!(out, "  User: {username}");
            let _ = writeln!(out, "  Pass: {password}");
        }
        TenantOutcome::CredentialMissing {
            url,
            username,
            volume,
            timed_out,
            ..
        } => {
            let _ = writeln!(
                out,
                "[WARN] Tenant: {} is running, password not found in logs.",
                report.name
            );
            if *timed_out {
                let _ = writeln!(out, "  (Gave up waiting for the first-boot log line.)");
            }
            let _ = writeln!(
                out,
                "  (The password is only printed when volume '{volume}' is first initialised;"
            );
            let _ = writeln!(out, "   a volume left from a previous run suppresses it.)");
            let _ = writeln!(out, "  URL:  {url}");
            let _ = writeln!(out, "  User: {username}");
            let _ = writeln!(
                out,
                "  Action: run 'docker volume rm {volume}' and redeploy for a fresh password."
            );
        }
        TenantOutcome::Failed { stage, error } => {
            let _ = writeln!(
                out,
                "[ERROR] Tenant: {} failed during {}: {error}",
                report.name,
                stage.as_str()
            );
        }
    }
    out
}

pub fn summary_line(report: &BatchReport) -> String {
    let s = &report.summary;
    format!(
        "=== DEPLOYMENT DONE: {} tenants, {} ready, {} without password, {} failed ===",
        s.total, s.ready, s.warned, s.failed
    )
}
