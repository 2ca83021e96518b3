// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockout after repeated failed verifications.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use lockstep_core::LockstepError;
use tracing::warn;

#[derive(Debug, Default)]
struct AttemptState {
    failures: u32,
    locked_until: Option<Instant>,
}

/// Counts consecutive failed verifications and locks out further attempts
/// for `lockout` once `max_attempts` is reached. A success resets the count.
#[derive(Debug)]
pub struct AttemptLimiter {
    max_attempts: u32,
    lockout: Duration,
    state: Mutex<AttemptState>,
}

impl AttemptLimiter {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            lockout,
            state: Mutex::new(AttemptState::default()),
        }
    }

    /// Fails with `LockedOut` while a lockout is in effect.
    pub fn check(&self) -> Result<(), LockstepError> {
        self.check_at(Instant::now())
    }

    pub fn check_at(&self, now: Instant) -> Result<(), LockstepError> {
        let mut state = self.lock()?;
        match state.locked_until {
            Some(until) if until > now => Err(LockstepError::LockedOut {
                retry_after: until - now,
            }),
            Some(_) => {
                state.locked_until = None;
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn record_failure(&self) -> Result<(), LockstepError> {
        self.record_failure_at(Instant::now())
    }

    pub fn record_failure_at(&self, now: Instant) -> Result<(), LockstepError> {
        let mut state = self.lock()?;
        state.failures += 1;
        if state.failures >= self.max_attempts {
            warn!(
                attempts = state.failures,
                lockout_secs = self.lockout.as_secs(),
                "verification locked out"
            );
            state.failures = 0;
            state.locked_until = Some(now + self.lockout);
        }
        Ok(())
    }

    pub fn record_success(&self) -> Result<(), LockstepError> {
        let mut state = self.lock()?;
        state.failures = 0;
        state.locked_until = None;
        Ok(())
    }

    /// Consecutive failures since the last success or lockout.
    pub fn failures(&self) -> u32 {
        self.state.lock().map(|s| s.failures).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, AttemptState>, LockstepError> {
        self.state
            .lock()
            .map_err(|_| LockstepError::Internal("attempt limiter lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCKOUT: Duration = Duration::from_secs(1800);

    #[test]
    fn locks_after_max_attempts() {
        let limiter = AttemptLimiter::new(3, LOCKOUT);
        let now = Instant::now();
        for _ in 0..2 {
            limiter.record_failure_at(now).unwrap();
            assert!(limiter.check_at(now).is_ok());
        }
        limiter.record_failure_at(now).unwrap();

        match limiter.check_at(now + Duration::from_secs(60)) {
            Err(LockstepError::LockedOut { retry_after }) => {
                assert_eq!(retry_after, Duration::from_secs(1740));
            }
            other => panic!("expected lockout, got {other:?}"),
        }
    }

    #[test]
    fn lockout_elapses() {
        let limiter = AttemptLimiter::new(1, LOCKOUT);
        let now = Instant::now();
        limiter.record_failure_at(now).unwrap();
        assert!(limiter.check_at(now + LOCKOUT - Duration::from_secs(1)).is_err());
        assert!(limiter.check_at(now + LOCKOUT).is_ok());
        assert!(limiter.check_at(now).is_ok());
    }

    #[test]
    fn success_resets_failures() {
        let limiter = AttemptLimiter::new(3, LOCKOUT);
        let now = Instant::now();
        limiter.record_failure_at(now).unwrap();
        limiter.record_failure_at(now).unwrap();
        limiter.record_success().unwrap();
        assert_eq!(limiter.failures(), 0);
        limiter.record_failure_at(now).unwrap();
        assert!(limiter.check_at(now).is_ok());
    }
}
