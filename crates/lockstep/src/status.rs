// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockstep status` command implementation.
//!
//! Reports where the credential was loaded from and whether each artifact
//! currently embeds it. Read-only.

use lockstep_config::LockstepConfig;
use lockstep_core::{LockstepError, RecordOrigin};
use lockstep_credential::mask_secret;
use lockstep_propagate::{ArtifactSpec, substitute};
use serde::Serialize;

use crate::bootstrap;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub origin: RecordOrigin,
    pub secret_preview: String,
    pub fingerprint: String,
    pub artifacts: Vec<ArtifactStatus>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactStatus {
    pub label: String,
    pub path: String,
    /// `current`, `stale`, `pattern not found`, or `missing`.
    pub state: &'static str,
}

fn artifact_state(spec: &ArtifactSpec, secret: &str) -> &'static str {
    match std::fs::read_to_string(&spec.path) {
        Err(_) => "missing",
        Ok(content) => {
            let sub = substitute(&content, &spec.pattern, secret);
            if sub.matches == 0 {
                "pattern not found"
            } else if sub.replacements == 0 {
                "current"
            } else {
                "stale"
            }
        }
    }
}

pub fn collect_status(config: &LockstepConfig) -> Result<StatusReport, LockstepError> {
    let (credential, origin) = bootstrap::load_credential(config)?;
    let record = credential.snapshot()?;
    let artifacts = ArtifactSpec::from_config(config)?
        .iter()
        .map(|spec| ArtifactStatus {
            label: spec.label.clone(),
            path: spec.path.display().to_string(),
            state: artifact_state(spec, record.secret()),
        })
        .collect();

    Ok(StatusReport {
        origin,
        secret_preview: mask_secret(record.secret()),
        fingerprint: record.fingerprint().to_string(),
        artifacts,
    })
}

/// Run the `lockstep status` command.
pub fn run_status(config: &LockstepConfig, json: bool) -> Result<(), LockstepError> {
    let report = collect_status(config)?;

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| LockstepError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    println!("Credential source: {}", report.origin);
    println!("Secret:            {}", report.secret_preview);
    println!("Fingerprint:       {}", report.fingerprint);
    if report.artifacts.is_empty() {
        println!("No artifacts configured.");
    }
    for artifact in &report.artifacts {
        println!("  {:<18} {} ({})", artifact.state, artifact.label, artifact.path);
    }
    Ok(())
}
