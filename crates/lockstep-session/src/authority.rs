// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Issuing and checking verification sessions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lockstep_config::model::SessionConfig;
use lockstep_core::{LockstepError, SessionState, SessionStore};
use lockstep_credential::SharedCredential;
use tracing::{debug, info, warn};

use crate::limiter::AttemptLimiter;
use crate::session::{Session, classify_at};
use crate::store::{FileSessionStore, MemorySessionStore};

/// Issues sessions on successful verification and classifies stored ones.
///
/// Sessions are bound to the credential fingerprint at issue time, so a
/// rotation invalidates every outstanding session without tracking them.
pub struct SessionAuthority {
    credential: SharedCredential,
    store: Arc<dyn SessionStore>,
    key: String,
    ttl: Duration,
    limiter: AttemptLimiter,
}

impl SessionAuthority {
    pub fn new(
        credential: SharedCredential,
        store: Arc<dyn SessionStore>,
        key: impl Into<String>,
        ttl: Duration,
        limiter: AttemptLimiter,
    ) -> Self {
        Self {
            credential,
            store,
            key: key.into(),
            ttl,
            limiter,
        }
    }

    /// Build an authority with the store selected by `config.store_dir`.
    pub fn from_config(
        credential: SharedCredential,
        config: &SessionConfig,
    ) -> Result<Self, LockstepError> {
        let store: Arc<dyn SessionStore> = match &config.store_dir {
            Some(dir) => {
                info!(dir = %dir, "using file session store");
                Arc::new(FileSessionStore::open(dir)?)
            }
            None => Arc::new(MemorySessionStore::new()),
        };
        Ok(Self::new(
            credential,
            store,
            &config.storage_key,
            Duration::from_secs(config.ttl_secs),
            AttemptLimiter::new(
                config.max_login_attempts,
                Duration::from_secs(config.lockout_secs),
            ),
        ))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn limiter(&self) -> &AttemptLimiter {
        &self.limiter
    }

    /// Verify `candidate` and, on success, store a fresh session.
    pub fn issue(&self, candidate: &str) -> Result<Session, LockstepError> {
        self.issue_at(candidate, Utc::now().timestamp_millis())
    }

    pub fn issue_at(&self, candidate: &str, now_ms: i64) -> Result<Session, LockstepError> {
        let session = self.grant_at(candidate, now_ms)?;
        let blob = serde_json::to_string(&session).map_err(|e| LockstepError::SessionStore {
            message: "cannot serialize session".to_string(),
            source: Some(Box::new(e)),
        })?;
        self.store.save(&self.key, &blob)?;
        Ok(session)
    }

    /// Verify `candidate` and return a fresh session without storing it.
    ///
    /// For remote callers, which keep the session themselves.
    pub fn grant(&self, candidate: &str) -> Result<Session, LockstepError> {
        self.grant_at(candidate, Utc::now().timestamp_millis())
    }

    pub fn grant_at(&self, candidate: &str, now_ms: i64) -> Result<Session, LockstepError> {
        self.limiter.check()?;

        if !self.credential.verify(candidate) {
            self.limiter.record_failure()?;
            warn!(failures = self.limiter.failures(), "verification failed");
            return Err(LockstepError::Unauthorized);
        }
        self.limiter.record_success()?;

        let session = Session::new(self.credential.fingerprint()?, now_ms);
        info!(fingerprint = session.fingerprint.short(), "session issued");
        Ok(session)
    }

    /// Classify a caller-held session against the current fingerprint.
    pub fn classify(&self, session: &Session) -> Result<SessionState, LockstepError> {
        self.classify_session_at(session, Utc::now().timestamp_millis())
    }

    pub fn classify_session_at(
        &self,
        session: &Session,
        now_ms: i64,
    ) -> Result<SessionState, LockstepError> {
        let current = self.credential.fingerprint()?;
        Ok(classify_at(session, &current, self.ttl, now_ms))
    }

    /// Classify the stored session, removing it when expired or invalidated.
    pub fn check(&self) -> Result<SessionState, LockstepError> {
        self.check_at(Utc::now().timestamp_millis())
    }

    pub fn check_at(&self, now_ms: i64) -> Result<SessionState, LockstepError> {
        let Some(blob) = self.store.load(&self.key)? else {
            return Ok(SessionState::Unverified);
        };

        let session: Session = match serde_json::from_str(&blob) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "discarding unreadable session");
                self.store.remove(&self.key)?;
                return Ok(SessionState::Unverified);
            }
        };

        let state = self.classify_session_at(&session, now_ms)?;
        match state {
            SessionState::Expired | SessionState::Invalidated => {
                debug!(state = %state, "clearing stale session");
                self.store.remove(&self.key)?;
            }
            SessionState::Unverified => self.store.remove(&self.key)?,
            SessionState::Verified => {}
        }
        Ok(state)
    }

    /// True when a valid session is stored.
    pub fn is_verified(&self) -> Result<bool, LockstepError> {
        Ok(self.check()? == SessionState::Verified)
    }

    /// Remove the stored session.
    pub fn logout(&self) -> Result<(), LockstepError> {
        self.store.remove(&self.key)?;
        info!("session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
