// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The client-held verification session and its validity rule.

use std::time::Duration;

use chrono::Utc;
use lockstep_core::SessionState;
use lockstep_credential::Fingerprint;
use serde::{Deserialize, Serialize};

/// Proof that the holder verified against the credential at some instant.
///
/// Serialized as `{"verified": true, "timestamp": <ms>, "passwordHash": "<hex>"}`,
/// the shape browser clients keep in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub verified: bool,
    /// Unix milliseconds at verification.
    #[serde(rename = "timestamp")]
    pub verified_at: i64,
    /// Fingerprint of the credential at verification.
    #[serde(rename = "passwordHash")]
    pub fingerprint: Fingerprint,
}

impl Session {
    pub fn new(fingerprint: Fingerprint, verified_at: i64) -> Self {
        Self {
            verified: true,
            verified_at,
            fingerprint,
        }
    }
}

/// True while the session is younger than `ttl` and bound to `current`.
pub fn is_session_valid(session: &Session, current: &Fingerprint, ttl: Duration) -> bool {
    is_session_valid_at(session, current, ttl, Utc::now().timestamp_millis())
}

pub fn is_session_valid_at(
    session: &Session,
    current: &Fingerprint,
    ttl: Duration,
    now_ms: i64,
) -> bool {
    classify_at(session, current, ttl, now_ms) == SessionState::Verified
}

/// Classify a stored session against the current fingerprint.
///
/// A fingerprint mismatch takes precedence over expiry.
pub fn classify_at(
    session: &Session,
    current: &Fingerprint,
    ttl: Duration,
    now_ms: i64,
) -> SessionState {
    if !session.verified {
        return SessionState::Unverified;
    }
    if &session.fingerprint != current {
        return SessionState::Invalidated;
    }
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    if now_ms.saturating_sub(session.verified_at) >= ttl_ms {
        return SessionState::Expired;
    }
    SessionState::Verified
}
