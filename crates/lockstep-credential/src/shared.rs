// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared, explicitly passed handle to the process's credential record.

use std::sync::{Arc, RwLock};

use lockstep_core::LockstepError;
use secrecy::SecretString;
use tracing::error;

use crate::digest::Fingerprint;
use crate::record::CredentialRecord;
use crate::verify::verify;

/// Cloneable handle to the one credential record of this process.
///
/// Every component receives this handle at construction; there is no ambient
/// lookup. Readers take snapshots; the propagation engine is the only writer.
#[derive(Debug, Clone)]
pub struct SharedCredential {
    inner: Arc<RwLock<CredentialRecord>>,
}

impl SharedCredential {
    pub fn new(record: CredentialRecord) -> Self {
        Self {
            inner: Arc::new(RwLock::new(record)),
        }
    }

    /// A point-in-time copy of the record.
    pub fn snapshot(&self) -> Result<CredentialRecord, LockstepError> {
        self.inner
            .read()
            .map(|record| record.clone())
            .map_err(|_| LockstepError::Internal("credential record lock poisoned".to_string()))
    }

    /// The current fingerprint.
    pub fn fingerprint(&self) -> Result<Fingerprint, LockstepError> {
        self.inner
            .read()
            .map(|record| record.fingerprint().clone())
            .map_err(|_| LockstepError::Internal("credential record lock poisoned".to_string()))
    }

    /// Verify `candidate` against the current record.
    ///
    /// Returns false when the record cannot be read; the failure is logged here
    /// and never surfaced as an error.
    pub fn verify(&self, candidate: &str) -> bool {
        match self.inner.read() {
            Ok(record) => verify(candidate, &record),
            Err(_) => {
                error!("credential record lock poisoned; rejecting verification");
                false
            }
        }
    }

    /// Atomically verify `proof` and rotate to `new_secret`.
    ///
    /// Returns the previous secret and the updated record. The proof check and
    /// the update happen under one write lock.
    pub fn rotate(
        &self,
        proof: &str,
        new_secret: &str,
    ) -> Result<(SecretString, CredentialRecord), LockstepError> {
        self.rotate_checked(proof, new_secret, |_| Ok(()))
    }

    /// Like [`rotate`](Self::rotate), running `check` on `new_secret` after
    /// the proof is verified and before the record changes.
    pub fn rotate_checked<F>(
        &self,
        proof: &str,
        new_secret: &str,
        check: F,
    ) -> Result<(SecretString, CredentialRecord), LockstepError>
    where
        F: FnOnce(&str) -> Result<(), LockstepError>,
    {
        let mut record = self
            .inner
            .write()
            .map_err(|_| LockstepError::Internal("credential record lock poisoned".to_string()))?;
        if !verify(proof, &record) {
            return Err(LockstepError::Unauthorized);
        }
        check(new_secret)?;
        let previous = record.rotate_to(new_secret)?;
        Ok((previous, record.clone()))
    }
}
