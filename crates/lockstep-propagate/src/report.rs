// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-artifact outcomes and the report of a propagation pass.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use lockstep_core::ArtifactErrorKind;
use lockstep_credential::Fingerprint;
use secrecy::SecretString;
use serde::Serialize;

use crate::artifact::ArtifactSpec;

/// What happened to one artifact during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactOutcome {
    pub label: String,
    pub path: PathBuf,
    pub success: bool,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ArtifactErrorKind>,
    /// Occurrences rewritten in the file.
    pub replacements: usize,
}

impl ArtifactOutcome {
    pub(crate) fn updated(spec: &ArtifactSpec, replacements: usize) -> Self {
        Self {
            label: spec.label.clone(),
            path: spec.path.clone(),
            success: true,
            detail: "updated".to_string(),
            error: None,
            replacements,
        }
    }

    pub(crate) fn failed(spec: &ArtifactSpec, kind: ArtifactErrorKind) -> Self {
        Self {
            label: spec.label.clone(),
            path: spec.path.clone(),
            success: false,
            detail: kind.detail().to_string(),
            error: Some(kind),
            replacements: 0,
        }
    }
}

/// The full result of `propagate` or `sync_current`.
#[derive(Debug)]
pub struct PropagationReport {
    pub results: Vec<ArtifactOutcome>,
    pub success_count: usize,
    /// Secret that was current before the pass.
    pub old_secret: SecretString,
    pub new_fingerprint: Fingerprint,
    /// Record version after the pass.
    pub version: u64,
    pub timestamp: DateTime<Utc>,
}

impl PropagationReport {
    /// True when every artifact was written.
    pub fn all_succeeded(&self) -> bool {
        self.success_count == self.results.len()
    }

    /// Outcomes that were not successful writes.
    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.results.iter().filter(|r| !r.success)
    }
}
