// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The propagation engine: the single entry point that mutates the credential.

use std::sync::Mutex;

use chrono::Utc;
use lockstep_config::LockstepConfig;
use lockstep_core::{ArtifactErrorKind, LockstepError};
use lockstep_credential::{CredentialRecord, SharedCredential, looks_like_fingerprint};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::artifact::{ArtifactSpec, read_artifact, substitute, write_artifact};
use crate::report::{ArtifactOutcome, PropagationReport};

/// Rotates the credential and rewrites it into every dependent artifact.
///
/// Passes are serialized. Artifact failures are reported per artifact and
/// never roll back the record update or earlier writes.
#[derive(Debug)]
pub struct PropagationEngine {
    credential: SharedCredential,
    artifacts: Vec<ArtifactSpec>,
    min_length: usize,
    lock: Mutex<()>,
}

impl PropagationEngine {
    pub fn new(credential: SharedCredential, artifacts: Vec<ArtifactSpec>, min_length: usize) -> Self {
        Self {
            credential,
            artifacts,
            min_length,
            lock: Mutex::new(()),
        }
    }

    /// Build an engine over the artifacts named in `config`.
    pub fn from_config(
        credential: SharedCredential,
        config: &LockstepConfig,
    ) -> Result<Self, LockstepError> {
        let artifacts = ArtifactSpec::from_config(config)?;
        Ok(Self::new(credential, artifacts, config.credential.min_length))
    }

    pub fn credential(&self) -> &SharedCredential {
        &self.credential
    }

    pub fn artifacts(&self) -> &[ArtifactSpec] {
        &self.artifacts
    }

    /// Rotate to `new_secret` after `proof` is verified against the current record.
    ///
    /// Fails with `Unauthorized`, `WeakSecret`, or `InvalidSecret` before any
    /// write. Otherwise the record is updated and every artifact is attempted.
    pub fn propagate(
        &self,
        new_secret: &str,
        proof: &str,
    ) -> Result<PropagationReport, LockstepError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| LockstepError::Internal("propagation lock poisoned".to_string()))?;

        let rotated = self
            .credential
            .rotate_checked(proof, new_secret, |secret| self.check_new_secret(secret));
        let (old_secret, record) = match rotated {
            Ok(rotated) => rotated,
            Err(LockstepError::Unauthorized) => {
                warn!("rotation rejected: current credential not verified");
                return Err(LockstepError::Unauthorized);
            }
            Err(e) => return Err(e),
        };
        info!(
            version = record.version(),
            fingerprint = record.fingerprint().short(),
            "credential rotated"
        );

        let results = self.write_all(new_secret);
        Ok(report(results, old_secret, &record))
    }

    /// Rewrite the current secret into every artifact without rotating.
    pub fn sync_current(&self) -> Result<PropagationReport, LockstepError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| LockstepError::Internal("propagation lock poisoned".to_string()))?;

        let record = self.credential.snapshot()?;
        info!(
            version = record.version(),
            fingerprint = record.fingerprint().short(),
            "syncing current credential"
        );
        let results = self.write_all(record.secret());
        let current = SecretString::from(record.secret().to_owned());
        Ok(report(results, current, &record))
    }

    fn check_new_secret(&self, new_secret: &str) -> Result<(), LockstepError> {
        let len = new_secret.chars().count();
        if len < self.min_length {
            return Err(LockstepError::WeakSecret {
                min_len: self.min_length,
                actual: len,
            });
        }
        if new_secret
            .chars()
            .any(|c| matches!(c, '\'' | '"' | '`') || c.is_control())
        {
            return Err(LockstepError::InvalidSecret(
                "new secret must not contain quotes, backticks, or control characters"
                    .to_string(),
            ));
        }
        if looks_like_fingerprint(new_secret) {
            return Err(LockstepError::InvalidSecret(
                "new secret must not be 64 hexadecimal characters".to_string(),
            ));
        }
        Ok(())
    }

    fn write_all(&self, secret: &str) -> Vec<ArtifactOutcome> {
        self.artifacts
            .iter()
            .map(|spec| apply(spec, secret))
            .collect()
    }
}

fn apply(spec: &ArtifactSpec, secret: &str) -> ArtifactOutcome {
    let content = match read_artifact(&spec.path) {
        Ok(content) => content,
        Err(e) => return failure(spec, e),
    };

    let sub = substitute(&content, &spec.pattern, secret);
    if sub.matches == 0 {
        return failure(
            spec,
            LockstepError::PatternNotMatched {
                label: spec.label.clone(),
            },
        );
    }
    if sub.replacements == 0 {
        debug!(artifact = %spec.label, "artifact already current");
        return ArtifactOutcome::failed(spec, ArtifactErrorKind::NoChange);
    }

    match write_artifact(&spec.path, &sub.content) {
        Ok(()) => {
            info!(
                artifact = %spec.label,
                path = %spec.path.display(),
                replacements = sub.replacements,
                "artifact updated"
            );
            ArtifactOutcome::updated(spec, sub.replacements)
        }
        Err(e) => failure(spec, e),
    }
}

fn failure(spec: &ArtifactSpec, err: LockstepError) -> ArtifactOutcome {
    warn!(artifact = %spec.label, error = %err, "artifact not updated");
    let kind = err
        .artifact_kind()
        .unwrap_or(ArtifactErrorKind::WriteFailure);
    ArtifactOutcome::failed(spec, kind)
}

fn report(
    results: Vec<ArtifactOutcome>,
    old_secret: SecretString,
    record: &CredentialRecord,
) -> PropagationReport {
    let success_count = results.iter().filter(|r| r.success).count();
    PropagationReport {
        results,
        success_count,
        old_secret,
        new_fingerprint: record.fingerprint().clone(),
        version: record.version(),
        timestamp: Utc::now(),
    }
}
