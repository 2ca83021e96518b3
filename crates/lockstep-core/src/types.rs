// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the credential, propagation, and session crates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Classification of a single artifact outcome that was not a successful write.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ArtifactErrorKind {
    /// The artifact file does not exist.
    NotFound,
    /// The artifact contains no recognizable credential.
    PatternNotMatched,
    /// Reading or writing the artifact failed.
    WriteFailure,
    /// The artifact already embeds the requested secret.
    NoChange,
}

impl ArtifactErrorKind {
    /// Human-readable detail string reported to callers.
    pub fn detail(self) -> &'static str {
        match self {
            ArtifactErrorKind::NotFound => "artifact not found",
            ArtifactErrorKind::PatternNotMatched => "pattern not found",
            ArtifactErrorKind::WriteFailure => "write failed",
            ArtifactErrorKind::NoChange => "no change needed",
        }
    }
}

/// Where the authoritative credential was loaded from at startup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordOrigin {
    /// Read from the primary credential source file.
    Persisted,
    /// Read from the environment override variable.
    Environment,
    /// The compiled-in fallback secret.
    Fallback,
}

/// Verification session lifecycle state.
///
/// Every state other than `Verified` leads back to `Unverified` once the
/// stored session is cleared.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    Unverified,
    Verified,
    Expired,
    Invalidated,
}
