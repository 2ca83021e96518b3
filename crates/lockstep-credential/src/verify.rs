// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verification of caller-supplied credentials.
//!
//! Callers may hold either the plaintext secret or a previously cached
//! fingerprint and do not declare which. Checks run in order and the first
//! match wins:
//! 1. exact equality with the plaintext secret
//! 2. a 64-hex candidate compared (case-insensitively) with the fingerprint
//! 3. the digest of the candidate compared with the fingerprint
//!
//! A plaintext secret that is itself 64 hex characters is still accepted by
//! step 1; rotation refuses to create such secrets.

use crate::digest::{Fingerprint, digest};
use crate::record::CredentialRecord;

/// Which rule accepted a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Plaintext,
    Fingerprint,
    Digest,
}

/// True when `candidate` proves knowledge of `record`'s secret.
pub fn verify(candidate: &str, record: &CredentialRecord) -> bool {
    verify_detailed(candidate, record).is_some()
}

/// Like [`verify`], reporting which rule matched.
pub fn verify_detailed(candidate: &str, record: &CredentialRecord) -> Option<MatchKind> {
    if candidate == record.secret() {
        return Some(MatchKind::Plaintext);
    }

    if let Some(fingerprint) = Fingerprint::parse(candidate) {
        if &fingerprint == record.fingerprint() {
            return Some(MatchKind::Fingerprint);
        }
    }

    if &digest(candidate) == record.fingerprint() {
        return Some(MatchKind::Digest);
    }

    None
}
