// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup loading of the credential record.
//!
//! Sources are tried in order: the primary source file, the environment
//! override, then the configured fallback. The record is fully loaded before
//! any dependent component is constructed.

use std::path::Path;

use lockstep_config::model::CredentialConfig;
use lockstep_core::{LockstepError, RecordOrigin};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::record::CredentialRecord;

/// A loaded record and the source it came from.
#[derive(Debug, Clone)]
pub struct LoadedCredential {
    pub record: CredentialRecord,
    pub origin: RecordOrigin,
}

/// Load the credential record using the process environment.
pub fn load_record(config: &CredentialConfig) -> Result<LoadedCredential, LockstepError> {
    load_record_with(config, |name| std::env::var(name).ok())
}

/// Load the credential record with an explicit environment lookup.
pub fn load_record_with<F>(
    config: &CredentialConfig,
    env_lookup: F,
) -> Result<LoadedCredential, LockstepError>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(&config.source_pattern).map_err(|e| {
        LockstepError::Config(format!("credential.source_pattern is not a valid regex: {e}"))
    })?;

    if let Some(path) = &config.source_path {
        if let Some(secret) = read_persisted(Path::new(path), &pattern) {
            info!(path = %path, "credential loaded from primary source");
            return Ok(LoadedCredential {
                record: CredentialRecord::new(&secret)?,
                origin: RecordOrigin::Persisted,
            });
        }
    }

    if let Some(secret) = env_lookup(&config.env_var).filter(|s| !s.is_empty()) {
        info!(var = %config.env_var, "credential loaded from environment override");
        return Ok(LoadedCredential {
            record: CredentialRecord::new(&secret)?,
            origin: RecordOrigin::Environment,
        });
    }

    if config.fallback_secret.is_empty() {
        return Err(LockstepError::Config(
            "no credential available: source, environment, and fallback are all empty"
                .to_string(),
        ));
    }

    warn!("credential loaded from compiled fallback; configure credential.source_path");
    Ok(LoadedCredential {
        record: CredentialRecord::new(&config.fallback_secret)?,
        origin: RecordOrigin::Fallback,
    })
}

/// Read the embedded secret from the primary source, if present.
fn read_persisted(path: &Path, pattern: &Regex) -> Option<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "primary credential source does not exist");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read primary credential source");
            return None;
        }
    };

    let secret = pattern
        .captures(&content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty());

    if secret.is_none() {
        warn!(path = %path.display(), "primary credential source has no recognizable credential");
    }
    secret
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn config_with_source(path: Option<&Path>) -> CredentialConfig {
        CredentialConfig {
            source_path: path.map(|p| p.display().to_string()),
            ..CredentialConfig::default()
        }
    }

    #[test]
    fn persisted_source_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "const MASTER_CONFIG = {{ auth: {{ password: 'fromfile1' }} }};").unwrap();

        let config = config_with_source(Some(file.path()));
        let loaded = load_record_with(&config, |_| Some("fromenv1".to_string())).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Persisted);
        assert_eq!(loaded.record.secret(), "fromfile1");
    }

    #[test]
    fn environment_used_when_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_source(Some(&dir.path().join("absent.js")));
        let loaded = load_record_with(&config, |name| {
            (name == "PASSWORD").then(|| "fromenv1".to_string())
        })
        .unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Environment);
        assert_eq!(loaded.record.secret(), "fromenv1");
    }

    #[test]
    fn environment_used_when_source_has_no_pattern() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "// nothing to see").unwrap();

        let config = config_with_source(Some(file.path()));
        let loaded = load_record_with(&config, |_| Some("fromenv1".to_string())).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Environment);
    }

    #[test]
    fn empty_environment_value_is_ignored() {
        let config = config_with_source(None);
        let loaded = load_record_with(&config, |_| Some(String::new())).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Fallback);
        assert_eq!(loaded.record.secret(), "admin123");
    }

    #[test]
    fn fallback_used_when_nothing_else() {
        let loaded = load_record_with(&CredentialConfig::default(), |_| None).unwrap();
        assert_eq!(loaded.origin, RecordOrigin::Fallback);
        assert_eq!(loaded.record.secret(), "admin123");
    }

    #[test]
    fn no_source_at_all_is_an_error() {
        let config = CredentialConfig {
            fallback_secret: String::new(),
            ..CredentialConfig::default()
        };
        assert!(matches!(
            load_record_with(&config, |_| None),
            Err(LockstepError::Config(_))
        ));
    }

    #[test]
    fn first_match_in_source_is_used() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "password: \"first111\",\npassword: \"second22\",").unwrap();
        let loaded =
            load_record_with(&config_with_source(Some(file.path())), |_| None).unwrap();
        assert_eq!(loaded.record.secret(), "first111");
    }
}
