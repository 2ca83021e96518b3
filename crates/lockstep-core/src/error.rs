// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lockstep credential service.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::ArtifactErrorKind;

/// The primary error type used across all Lockstep crates.
///
/// Precondition failures (`Unauthorized`, `WeakSecret`, `InvalidSecret`) abort a
/// rotation before any write. Artifact failures are reported per artifact and
/// never abort a propagation pass. Relay failures reject a single request.
#[derive(Debug, Error)]
pub enum LockstepError {
    /// Configuration errors (invalid TOML, bad patterns, missing values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The caller could not prove knowledge of the current credential.
    #[error("unauthorized: current credential verification failed")]
    Unauthorized,

    /// The proposed secret is shorter than the configured minimum.
    #[error("new secret is too short: {actual} characters, at least {min_len} required")]
    WeakSecret { min_len: usize, actual: usize },

    /// The proposed secret cannot be embedded or would be ambiguous.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// A dependent artifact does not exist.
    #[error("artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// A dependent artifact exists but contains no recognizable credential.
    #[error("pattern not found in {label}")]
    PatternNotMatched { label: String },

    /// A dependent artifact could not be read or written.
    #[error("failed to update artifact {}: {source}", path.display())]
    ArtifactWriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A relayed request carried a timestamp outside the replay window.
    #[error("relay token rejected: {}", describe_age(*age_ms))]
    ReplayRejected { age_ms: Option<i64> },

    /// A relayed request carried a fingerprint other than the current one.
    #[error("relay token fingerprint does not match the current credential")]
    FingerprintMismatch,

    /// Too many failed verification attempts.
    #[error("too many failed attempts, retry after {}s", retry_after.as_secs())]
    LockedOut { retry_after: Duration },

    /// Session store errors (unreadable directory, serialization failure).
    #[error("session store error: {message}")]
    SessionStore {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LockstepError {
    /// Returns the per-artifact classification for artifact-level errors.
    pub fn artifact_kind(&self) -> Option<ArtifactErrorKind> {
        match self {
            LockstepError::ArtifactNotFound { .. } => Some(ArtifactErrorKind::NotFound),
            LockstepError::PatternNotMatched { .. } => Some(ArtifactErrorKind::PatternNotMatched),
            LockstepError::ArtifactWriteFailure { .. } => Some(ArtifactErrorKind::WriteFailure),
            _ => None,
        }
    }

    /// True for the errors that abort a rotation before any artifact is touched.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            LockstepError::Unauthorized
                | LockstepError::WeakSecret { .. }
                | LockstepError::InvalidSecret(_)
                | LockstepError::LockedOut { .. }
        )
    }
}

fn describe_age(age_ms: Option<i64>) -> String {
    match age_ms {
        Some(age) if age < 0 => format!("timestamp is {}ms in the future", -age),
        Some(age) => format!("timestamp is {age}ms old"),
        None => "missing or malformed timestamp".to_string(),
    }
}
