// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as compilable artifact patterns, unique artifact paths, and non-zero windows.

use std::collections::HashSet;

use regex::Regex;

use crate::diagnostic::ConfigError;
use crate::model::LockstepConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LockstepConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let credential = &config.credential;
    if credential.fallback_secret.is_empty() {
        errors.push(ConfigError::Validation {
            message: "credential.fallback_secret must not be empty".to_string(),
        });
    }

    if credential.min_length < 1 {
        errors.push(ConfigError::Validation {
            message: "credential.min_length must be at least 1".to_string(),
        });
    }

    if credential.env_var.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "credential.env_var must not be empty".to_string(),
        });
    }

    if let Some(message) = check_pattern("credential.source_pattern", &credential.source_pattern)
    {
        errors.push(ConfigError::Validation { message });
    }

    if let Some(path) = &credential.source_path {
        if path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "credential.source_path must not be empty when set".to_string(),
            });
        }
    }

    // The primary source is rewritten like any artifact, so it takes part in
    // the duplicate-path check.
    let mut seen_paths = HashSet::new();
    if let Some(path) = &credential.source_path {
        seen_paths.insert(path.as_str());
    }

    for (i, artifact) in config.artifacts.iter().enumerate() {
        if artifact.label.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("artifacts[{i}].label must not be empty"),
            });
        }
        if artifact.path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("artifacts[{i}].path must not be empty"),
            });
        } else if !seen_paths.insert(artifact.path.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate artifact path `{}` in [[artifacts]] array",
                    artifact.path
                ),
            });
        }
        if let Some(message) = check_pattern(&format!("artifacts[{i}].pattern"), &artifact.pattern)
        {
            errors.push(ConfigError::Validation { message });
        }
    }

    if config.session.storage_key.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "session.storage_key must not be empty".to_string(),
        });
    }

    if config.session.ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "session.ttl_secs must be greater than 0".to_string(),
        });
    }

    if config.session.max_login_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "session.max_login_attempts must be at least 1".to_string(),
        });
    }

    if config.relay.max_age_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "relay.max_age_secs must be greater than 0".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that `pattern` compiles and has exactly one capture group.
fn check_pattern(field: &str, pattern: &str) -> Option<String> {
    match Regex::new(pattern) {
        Ok(re) => {
            // captures_len() counts the implicit whole-match group.
            let groups = re.captures_len() - 1;
            if groups == 1 {
                None
            } else {
                Some(format!(
                    "{field} must contain exactly one capture group, found {groups}"
                ))
            }
        }
        Err(e) => Some(format!("{field} is not a valid regex: {e}")),
    }
}
