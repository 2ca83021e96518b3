// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SHA-256 fingerprints of the shared secret.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 64;

/// A 64-character lowercase hexadecimal SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse a fingerprint in any letter case, normalizing to lowercase.
    ///
    /// Returns `None` unless `candidate` is exactly 64 hex characters.
    pub fn parse(candidate: &str) -> Option<Self> {
        if looks_like_fingerprint(candidate) {
            Some(Self(candidate.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> &str {
        &self.0[..16]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Fingerprint::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom("expected a 64-character hexadecimal fingerprint")
        })
    }
}

/// Compute the fingerprint of `secret`: SHA-256 over its UTF-8 bytes.
pub fn digest(secret: &str) -> Fingerprint {
    Fingerprint(hex::encode(Sha256::digest(secret.as_bytes())))
}

/// True when `candidate` has the shape of a fingerprint (64 hex chars, any case).
pub fn looks_like_fingerprint(candidate: &str) -> bool {
    candidate.len() == FINGERPRINT_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}
