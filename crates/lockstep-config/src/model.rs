// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Lockstep credential service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Pattern matching `password: '<secret>'` assignments in JS/TOML-like sources.
pub const DEFAULT_SOURCE_PATTERN: &str = r#"password:\s*['"`]([^'"`]+)['"`]"#;

/// Top-level Lockstep configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LockstepConfig {
    /// Process-level settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Authoritative credential sources and rotation rules.
    #[serde(default)]
    pub credential: CredentialConfig,

    /// Dependent artifacts that embed a copy of the secret.
    #[serde(default)]
    pub artifacts: Vec<ArtifactConfig>,

    /// Verification session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Relayed-request authentication settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Credential source and rotation configuration.
///
/// At startup the secret is taken from the first available of: the file at
/// `source_path` (matched with `source_pattern`), the `env_var` environment
/// variable, and `fallback_secret`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// Primary credential source file. Also rewritten on every rotation.
    #[serde(default)]
    pub source_path: Option<String>,

    /// Regex with one capture group locating the secret in `source_path`.
    #[serde(default = "default_source_pattern")]
    pub source_pattern: String,

    /// Environment variable consulted when the source file yields nothing.
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Secret used when no other source is available.
    #[serde(default = "default_fallback_secret")]
    pub fallback_secret: String,

    /// Minimum length accepted for a new secret.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            source_pattern: default_source_pattern(),
            env_var: default_env_var(),
            fallback_secret: default_fallback_secret(),
            min_length: default_min_length(),
        }
    }
}

fn default_source_pattern() -> String {
    DEFAULT_SOURCE_PATTERN.to_string()
}

fn default_env_var() -> String {
    "PASSWORD".to_string()
}

fn default_fallback_secret() -> String {
    "admin123".to_string()
}

fn default_min_length() -> usize {
    6
}

/// A dependent artifact entry (`[[artifacts]]`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Human-readable label used in reports and logs.
    pub label: String,

    /// Path of the file embedding the secret.
    pub path: String,

    /// Regex with exactly one capture group around the embedded secret.
    #[serde(default = "default_source_pattern")]
    pub pattern: String,
}

/// Verification session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Key under which the session blob is stored.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Session lifetime in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Directory for the file-backed session store. `None` keeps sessions in memory.
    #[serde(default)]
    pub store_dir: Option<String>,

    /// Consecutive failed verifications allowed before lockout.
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    /// Lockout duration in seconds once the attempt limit is reached.
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            ttl_secs: default_ttl_secs(),
            store_dir: None,
            max_login_attempts: default_max_login_attempts(),
            lockout_secs: default_lockout_secs(),
        }
    }
}

fn default_storage_key() -> String {
    "authSession".to_string()
}

fn default_ttl_secs() -> u64 {
    90 * 24 * 60 * 60
}

fn default_max_login_attempts() -> u32 {
    5
}

fn default_lockout_secs() -> u64 {
    30 * 60
}

/// Relayed-request authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Maximum token age in seconds.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
        }
    }
}

fn default_max_age_secs() -> u64 {
    10 * 60
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}
