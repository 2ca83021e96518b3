// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signing and checking relayed requests against the shared credential.

use std::time::Duration;

use chrono::Utc;
use lockstep_config::model::RelayConfig;
use lockstep_core::LockstepError;
use lockstep_credential::SharedCredential;
use serde::Deserialize;

use crate::token::{check_token, sign_at};

/// Token parameters as they arrive in a query string.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RelayParams {
    pub auth: Option<String>,
    pub t: Option<String>,
}

/// Signs outbound relayed URLs and checks inbound ones.
///
/// Always consults the current fingerprint, so a rotation invalidates every
/// outstanding token.
#[derive(Debug, Clone)]
pub struct RelayAuthenticator {
    credential: SharedCredential,
    max_age: Duration,
}

impl RelayAuthenticator {
    pub fn new(credential: SharedCredential, max_age: Duration) -> Self {
        Self {
            credential,
            max_age,
        }
    }

    pub fn from_config(credential: SharedCredential, config: &RelayConfig) -> Self {
        Self::new(credential, Duration::from_secs(config.max_age_secs))
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn sign(&self, url: &str) -> Result<String, LockstepError> {
        self.sign_at(url, Utc::now().timestamp_millis())
    }

    pub fn sign_at(&self, url: &str, now_ms: i64) -> Result<String, LockstepError> {
        let fingerprint = self.credential.fingerprint()?;
        Ok(sign_at(url, &fingerprint, now_ms))
    }

    pub fn check(&self, params: &RelayParams) -> Result<(), LockstepError> {
        self.check_at(params, Utc::now().timestamp_millis())
    }

    pub fn check_at(&self, params: &RelayParams, now_ms: i64) -> Result<(), LockstepError> {
        let current = self.credential.fingerprint()?;
        check_token(
            params.auth.as_deref(),
            params.t.as_deref(),
            &current,
            now_ms,
            self.max_age,
        )
    }

    /// Boolean form of [`check`](Self::check). An unreadable credential
    /// rejects the request.
    pub fn validate(&self, params: &RelayParams) -> bool {
        self.check(params).is_ok()
    }
}
