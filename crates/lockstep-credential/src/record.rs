// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authoritative credential record.

use chrono::{DateTime, Utc};
use lockstep_core::LockstepError;
use secrecy::{ExposeSecret, SecretString};

use crate::digest::{Fingerprint, digest};

/// The single authoritative secret and its derived fingerprint.
///
/// The fingerprint is recomputed on every mutation and is never set
/// independently. Debug output omits the secret.
pub struct CredentialRecord {
    secret: SecretString,
    fingerprint: Fingerprint,
    version: u64,
    last_updated: DateTime<Utc>,
}

impl CredentialRecord {
    /// Create a record at version 1. The secret must not be empty.
    pub fn new(secret: &str) -> Result<Self, LockstepError> {
        if secret.is_empty() {
            return Err(LockstepError::InvalidSecret(
                "credential secret must not be empty".to_string(),
            ));
        }
        Ok(Self {
            secret: SecretString::from(secret.to_owned()),
            fingerprint: digest(secret),
            version: 1,
            last_updated: Utc::now(),
        })
    }

    /// The plaintext secret.
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Rotation counter, starting at 1.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Replace the secret, recompute the fingerprint, and bump the version.
    ///
    /// Returns the previous secret. Callers are expected to have verified the
    /// prior secret; `PropagationEngine` is the only production caller.
    pub fn rotate_to(&mut self, new_secret: &str) -> Result<SecretString, LockstepError> {
        if new_secret.is_empty() {
            return Err(LockstepError::InvalidSecret(
                "credential secret must not be empty".to_string(),
            ));
        }
        let previous = std::mem::replace(
            &mut self.secret,
            SecretString::from(new_secret.to_owned()),
        );
        self.fingerprint = digest(new_secret);
        self.version += 1;
        self.last_updated = Utc::now();
        Ok(previous)
    }
}

impl Clone for CredentialRecord {
    fn clone(&self) -> Self {
        Self {
            secret: SecretString::from(self.secret.expose_secret().to_owned()),
            fingerprint: self.fingerprint.clone(),
            version: self.version,
            last_updated: self.last_updated,
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("secret", &"[REDACTED]")
            .field("fingerprint", &self.fingerprint.short())
            .field("version", &self.version)
            .field("last_updated", &self.last_updated)
            .finish()
    }
}

/// Mask a secret for display: `"adm...123"`.
///
/// Shows up to three leading and trailing characters. Values shorter than
/// eight characters are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..3].iter().collect();
    let suffix: String = chars[chars.len() - 3..].iter().collect();
    format!("{prefix}...{suffix}")
}
