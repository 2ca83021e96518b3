// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dependent artifacts and the substitution that rewrites them.

use std::io::Write;
use std::path::{Path, PathBuf};

use lockstep_config::LockstepConfig;
use lockstep_core::LockstepError;
use regex::Regex;
use tempfile::NamedTempFile;

/// Label given to the primary credential source when it is propagated.
pub const PRIMARY_SOURCE_LABEL: &str = "primary credential source";

/// A file that embeds a copy of the secret.
#[derive(Debug, Clone)]
pub struct ArtifactSpec {
    pub label: String,
    pub path: PathBuf,
    /// One capture group around the embedded secret.
    pub pattern: Regex,
}

impl ArtifactSpec {
    pub fn new(
        label: impl Into<String>,
        path: impl Into<PathBuf>,
        pattern: &str,
    ) -> Result<Self, LockstepError> {
        let label = label.into();
        let pattern = Regex::new(pattern).map_err(|e| {
            LockstepError::Config(format!("pattern for artifact '{label}' is invalid: {e}"))
        })?;
        if pattern.captures_len() != 2 {
            return Err(LockstepError::Config(format!(
                "pattern for artifact '{label}' must have exactly one capture group"
            )));
        }
        Ok(Self {
            label,
            path: path.into(),
            pattern,
        })
    }

    /// Build the artifact list from configuration.
    ///
    /// The primary credential source, when configured, comes first.
    pub fn from_config(config: &LockstepConfig) -> Result<Vec<Self>, LockstepError> {
        let mut specs = Vec::with_capacity(config.artifacts.len() + 1);
        if let Some(source) = &config.credential.source_path {
            specs.push(Self::new(
                PRIMARY_SOURCE_LABEL,
                source,
                &config.credential.source_pattern,
            )?);
        }
        for artifact in &config.artifacts {
            specs.push(Self::new(&artifact.label, &artifact.path, &artifact.pattern)?);
        }
        Ok(specs)
    }
}

/// Result of substituting a secret into some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub content: String,
    /// Occurrences of the pattern found.
    pub matches: usize,
    /// Occurrences whose captured secret differed and was rewritten.
    pub replacements: usize,
}

/// Rewrite the captured span of every match of `pattern` in `content`.
///
/// Text outside the capture group is preserved byte for byte.
pub fn substitute(content: &str, pattern: &Regex, new_secret: &str) -> Substitution {
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut matches = 0;
    let mut replacements = 0;

    for caps in pattern.captures_iter(content) {
        let Some(embedded) = caps.get(1) else {
            continue;
        };
        matches += 1;
        if embedded.as_str() == new_secret {
            continue;
        }
        out.push_str(&content[cursor..embedded.start()]);
        out.push_str(new_secret);
        cursor = embedded.end();
        replacements += 1;
    }
    out.push_str(&content[cursor..]);

    Substitution {
        content: out,
        matches,
        replacements,
    }
}

/// Read an artifact, mapping a missing file to `ArtifactNotFound`.
pub(crate) fn read_artifact(path: &Path) -> Result<String, LockstepError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LockstepError::ArtifactNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LockstepError::ArtifactWriteFailure {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Replace `path` with `content` through a temporary file in the same directory.
///
/// The original file's permissions are carried over.
pub(crate) fn write_artifact(path: &Path, content: &str) -> Result<(), LockstepError> {
    let failure = |source: std::io::Error| LockstepError::ArtifactWriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = std::fs::metadata(path).map_err(failure)?.permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(failure)?;
    tmp.write_all(content.as_bytes()).map_err(failure)?;
    tmp.as_file().sync_all().map_err(failure)?;
    std::fs::set_permissions(tmp.path(), permissions).map_err(failure)?;
    tmp.persist(path).map_err(|e| failure(e.error))?;
    Ok(())
}
