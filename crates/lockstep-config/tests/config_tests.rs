// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Lockstep configuration system.

use lockstep_config::diagnostic::ConfigError;
use lockstep_config::model::LockstepConfig;
use lockstep_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_lockstep_config() {
    let toml = r#"
[service]
log_level = "debug"

[credential]
source_path = "config/master-config.js"
env_var = "LIBRE_PASSWORD"
fallback_secret = "changeme1"
min_length = 8

[[artifacts]]
label = "auth config"
path = "js/auth-config.js"

[[artifacts]]
label = "edge proxy"
path = "functions/proxy.js"
pattern = "const\\s+FIXED_PASSWORD\\s*=\\s*'([^']+)'"

[session]
storage_key = "libreSession"
ttl_secs = 3600
store_dir = "/tmp/lockstep-sessions"
max_login_attempts = 3
lockout_secs = 60

[relay]
max_age_secs = 300

[gateway]
host = "0.0.0.0"
port = 9000
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(
        config.credential.source_path.as_deref(),
        Some("config/master-config.js")
    );
    assert_eq!(config.credential.env_var, "LIBRE_PASSWORD");
    assert_eq!(config.credential.fallback_secret, "changeme1");
    assert_eq!(config.credential.min_length, 8);
    assert_eq!(config.artifacts.len(), 2);
    assert_eq!(config.artifacts[0].label, "auth config");
    assert_eq!(
        config.artifacts[0].pattern,
        lockstep_config::model::DEFAULT_SOURCE_PATTERN
    );
    assert_eq!(
        config.artifacts[1].pattern,
        r"const\s+FIXED_PASSWORD\s*=\s*'([^']+)'"
    );
    assert_eq!(config.session.storage_key, "libreSession");
    assert_eq!(config.session.ttl_secs, 3600);
    assert_eq!(
        config.session.store_dir.as_deref(),
        Some("/tmp/lockstep-sessions")
    );
    assert_eq!(config.session.max_login_attempts, 3);
    assert_eq!(config.session.lockout_secs, 60);
    assert_eq!(config.relay.max_age_secs, 300);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9000);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.log_level, "info");
    assert!(config.credential.source_path.is_none());
    assert_eq!(config.credential.env_var, "PASSWORD");
    assert_eq!(config.credential.fallback_secret, "admin123");
    assert_eq!(config.credential.min_length, 6);
    assert!(config.artifacts.is_empty());
    assert_eq!(config.session.storage_key, "authSession");
    assert_eq!(config.session.ttl_secs, 90 * 24 * 60 * 60);
    assert!(config.session.store_dir.is_none());
    assert_eq!(config.session.max_login_attempts, 5);
    assert_eq!(config.session.lockout_secs, 1800);
    assert_eq!(config.relay.max_age_secs, 600);
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8787);
}

/// Unknown field in [credential] is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_credential_produces_error() {
    let toml = r#"
[credential]
fallbak_secret = "x"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("fallbak_secret"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown key produces a diagnostic with a suggestion.
#[test]
fn unknown_key_diagnostic_suggests_correction() {
    let toml = r#"
[session]
ttl_sec = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should produce an UnknownKey diagnostic");
    assert_eq!(unknown.0, "ttl_sec");
    assert_eq!(unknown.1.as_deref(), Some("ttl_secs"));
}

/// An artifact entry without a path is reported as a missing key.
#[test]
fn artifact_without_path_is_missing_key() {
    let toml = r#"
[[artifacts]]
label = "orphan"
"#;

    let errors = load_and_validate_str(toml).expect_err("path is required");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key.ends_with("path"))),
        "expected a MissingKey error, got: {errors:?}"
    );
}

/// Wrong value type is reported as InvalidType.
#[test]
fn wrong_type_is_invalid_type() {
    let toml = r#"
[gateway]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("port must be an integer");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port")))
    );
}

/// Semantic validation runs after successful deserialization.
#[test]
fn validation_errors_surface_through_load_and_validate() {
    let toml = r#"
[[artifacts]]
label = "no group"
path = "a.js"
pattern = "password: '.+'"
"#;

    let errors = load_and_validate_str(toml).expect_err("pattern without group");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("capture group"))
    ));
}

/// Dotted figment overrides mirror what LOCKSTEP_* env vars produce.
#[test]
fn env_style_override_sets_nested_field() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: LockstepConfig = Figment::new()
        .merge(Serialized::defaults(LockstepConfig::default()))
        .merge(Toml::string("[credential]\nenv_var = \"FROM_TOML\"\n"))
        .merge(("credential.env_var", "FROM_ENV"))
        .merge(("session.ttl_secs", 120))
        .extract()
        .expect("should merge overrides");

    assert_eq!(config.credential.env_var, "FROM_ENV");
    assert_eq!(config.session.ttl_secs, 120);
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_file_is_skipped() {
    let config = lockstep_config::load_config_from_path(std::path::Path::new(
        "/nonexistent/lockstep.toml",
    ))
    .expect("missing file should be silently skipped");
    assert_eq!(config.gateway.port, 8787);
}
