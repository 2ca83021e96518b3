// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proxy auth tokens: the credential fingerprint plus a millisecond timestamp,
//! carried as the `auth` and `t` query parameters of a relayed URL.
//!
//! Replay protection is the timestamp window alone. A token can be replayed
//! freely within the window; there is no nonce tracking.

use std::time::Duration;

use chrono::Utc;
use lockstep_core::LockstepError;
use lockstep_credential::Fingerprint;

/// Query parameter carrying the fingerprint.
pub const AUTH_PARAM: &str = "auth";

/// Query parameter carrying the Unix-millisecond timestamp.
pub const TIME_PARAM: &str = "t";

/// Append a token to `url`, stamped now.
pub fn sign(url: &str, fingerprint: &Fingerprint) -> String {
    sign_at(url, fingerprint, Utc::now().timestamp_millis())
}

/// Append `auth=<fingerprint>&t=<now_ms>` to `url`.
///
/// Uses `&` when the URL already has a query and `?` otherwise. A fragment
/// stays at the end.
pub fn sign_at(url: &str, fingerprint: &Fingerprint, now_ms: i64) -> String {
    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let separator = if base.contains('?') { "&" } else { "?" };

    let mut signed = format!("{base}{separator}{AUTH_PARAM}={fingerprint}&{TIME_PARAM}={now_ms}");
    if let Some(fragment) = fragment {
        signed.push('#');
        signed.push_str(fragment);
    }
    signed
}

/// Check a token against the current fingerprint, returning the reason on rejection.
///
/// Rejects a missing `auth` with `Unauthorized` and any `auth` other than the
/// exact lowercase fingerprint with `FingerprintMismatch`. A token without `t`
/// is not age-checked. A non-numeric `t`, or one older than `max_age`, is
/// `ReplayRejected`. Timestamps ahead of `now_ms` are not rejected.
pub fn check_token(
    auth: Option<&str>,
    timestamp: Option<&str>,
    current: &Fingerprint,
    now_ms: i64,
    max_age: Duration,
) -> Result<(), LockstepError> {
    let auth = auth
        .filter(|a| !a.is_empty())
        .ok_or(LockstepError::Unauthorized)?;
    if auth != current.as_str() {
        return Err(LockstepError::FingerprintMismatch);
    }

    let Some(timestamp) = timestamp.filter(|t| !t.is_empty()) else {
        return Ok(());
    };
    let issued_at = timestamp
        .parse::<i64>()
        .map_err(|_| LockstepError::ReplayRejected { age_ms: None })?;
    let age_ms = now_ms.saturating_sub(issued_at);
    let max_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
    if age_ms > max_ms {
        return Err(LockstepError::ReplayRejected {
            age_ms: Some(age_ms),
        });
    }
    Ok(())
}

/// Boolean form of [`check_token`].
pub fn validate(
    auth: Option<&str>,
    timestamp: Option<&str>,
    current: &Fingerprint,
    now_ms: i64,
    max_age: Duration,
) -> bool {
    check_token(auth, timestamp, current, now_ms, max_age).is_ok()
}

#[cfg(test)]
mod tests {
    use lockstep_credential::digest;

    use super::*;

    const NOW: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;
    const WINDOW: Duration = Duration::from_secs(600);

    fn fp() -> Fingerprint {
        digest("admin123")
    }

    #[test]
    fn sign_without_query_uses_question_mark() {
        assert_eq!(
            sign_at("https://relay.local/proxy/a", &fp(), NOW),
            format!("https://relay.local/proxy/a?auth={}&t={NOW}", fp())
        );
    }

    #[test]
    fn sign_with_query_uses_ampersand() {
        assert_eq!(
            sign_at("/proxy?url=x", &fp(), NOW),
            format!("/proxy?url=x&auth={}&t={NOW}", fp())
        );
    }

    #[test]
    fn sign_keeps_fragment_last() {
        assert_eq!(
            sign_at("/proxy?url=x#frag", &fp(), NOW),
            format!("/proxy?url=x&auth={}&t={NOW}#frag", fp())
        );
        assert_eq!(
            sign_at("/proxy#a?b", &fp(), NOW),
            format!("/proxy?auth={}&t={NOW}#a?b", fp())
        );
    }

    #[test]
    fn sign_after_trailing_question_mark() {
        assert_eq!(
            sign_at("/proxy?", &fp(), NOW),
            format!("/proxy?&auth={}&t={NOW}", fp())
        );
    }

    #[test]
    fn replay_window() {
        let auth = fp().to_string();
        let nine = (NOW - 9 * MINUTE).to_string();
        let eleven = (NOW - 11 * MINUTE).to_string();
        assert!(validate(Some(&auth), Some(&nine), &fp(), NOW, WINDOW));
        assert!(!validate(Some(&auth), Some(&eleven), &fp(), NOW, WINDOW));

        let exact = (NOW - 10 * MINUTE).to_string();
        assert!(validate(Some(&auth), Some(&exact), &fp(), NOW, WINDOW));
    }

    #[test]
    fn stale_token_reports_age() {
        let auth = fp().to_string();
        let eleven = (NOW - 11 * MINUTE).to_string();
        match check_token(Some(&auth), Some(&eleven), &fp(), NOW, WINDOW) {
            Err(LockstepError::ReplayRejected { age_ms }) => assert_eq!(age_ms, Some(11 * MINUTE)),
            other => panic!("expected replay rejection, got {other:?}"),
        }
    }

    #[test]
    fn future_timestamps_are_accepted() {
        let auth = fp().to_string();
        let ahead = (NOW + 11 * MINUTE).to_string();
        let near = (NOW + MINUTE).to_string();
        assert!(validate(Some(&auth), Some(&ahead), &fp(), NOW, WINDOW));
        assert!(validate(Some(&auth), Some(&near), &fp(), NOW, WINDOW));
    }

    #[test]
    fn wrong_or_missing_auth_is_rejected() {
        let t = NOW.to_string();
        let other = digest("other").to_string();
        assert!(matches!(
            check_token(None, Some(&t), &fp(), NOW, WINDOW),
            Err(LockstepError::Unauthorized)
        ));
        assert!(matches!(
            check_token(Some(""), Some(&t), &fp(), NOW, WINDOW),
            Err(LockstepError::Unauthorized)
        ));
        assert!(matches!(
            check_token(Some(&other), Some(&t), &fp(), NOW, WINDOW),
            Err(LockstepError::FingerprintMismatch)
        ));
        assert!(matches!(
            check_token(Some("admin123"), Some(&t), &fp(), NOW, WINDOW),
            Err(LockstepError::FingerprintMismatch)
        ));
    }

    #[test]
    fn uppercase_fingerprint_is_rejected() {
        let upper = fp().to_string().to_ascii_uppercase();
        assert!(matches!(
            check_token(Some(&upper), Some(&NOW.to_string()), &fp(), NOW, WINDOW),
            Err(LockstepError::FingerprintMismatch)
        ));
    }

    #[test]
    fn missing_timestamp_skips_age_check() {
        let auth = fp().to_string();
        assert!(validate(Some(&auth), None, &fp(), NOW, WINDOW));
        assert!(validate(Some(&auth), Some(""), &fp(), NOW, WINDOW));
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let auth = fp().to_string();
        for t in ["soon", "12.5"] {
            assert!(matches!(
                check_token(Some(&auth), Some(t), &fp(), NOW, WINDOW),
                Err(LockstepError::ReplayRejected { age_ms: None })
            ));
        }
    }
}
