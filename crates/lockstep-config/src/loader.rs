// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lockstep.toml` > `~/.config/lockstep/lockstep.toml` > `/etc/lockstep/lockstep.toml`
//! with environment variable overrides via `LOCKSTEP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LockstepConfig;

/// Sections that may be overridden from the environment.
const ENV_SECTIONS: &[&str] = &["service", "credential", "session", "relay", "gateway"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lockstep/lockstep.toml` (system-wide)
/// 3. `~/.config/lockstep/lockstep.toml` (user XDG config)
/// 4. `./lockstep.toml` (local directory)
/// 5. `LOCKSTEP_*` environment variables
pub fn load_config() -> Result<LockstepConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LockstepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockstepConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LockstepConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LockstepConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LockstepConfig::default()))
        .merge(Toml::file("/etc/lockstep/lockstep.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("lockstep/lockstep.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("lockstep.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because field names contain
/// underscores: `LOCKSTEP_CREDENTIAL_SOURCE_PATH` must map to
/// `credential.source_path`, not `credential.source.path`.
fn env_provider() -> Env {
    Env::prefixed("LOCKSTEP_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env key to its dotted config path.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(field) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}
