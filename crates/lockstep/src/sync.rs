// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockstep sync` command implementation.
//!
//! With a new secret, rotates the credential and rewrites every artifact.
//! Without one, rewrites the current secret. The operator running the tool
//! has file access to the primary source, so the loaded secret serves as the
//! proof of knowledge for the rotation.

use std::path::Path;

use lockstep_config::LockstepConfig;
use lockstep_core::LockstepError;
use lockstep_credential::mask_secret;
use lockstep_propagate::{PropagationEngine, PropagationReport, render_deployment_notes};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::bootstrap;

pub fn run_sync(
    config: &LockstepConfig,
    new_secret: Option<String>,
    prompt: bool,
    notes: Option<&Path>,
) -> Result<PropagationReport, LockstepError> {
    let new_secret = match (new_secret, prompt) {
        (Some(secret), _) => Some(SecretString::from(secret)),
        (None, true) => Some(prompt_new_secret()?),
        (None, false) => None,
    };

    let (credential, origin) = bootstrap::load_credential(config)?;
    let engine = PropagationEngine::from_config(credential.clone(), config)?;

    let report = match &new_secret {
        Some(secret) => {
            let proof = credential.snapshot()?.secret().to_owned();
            println!("Rotating credential ({origin} source)");
            engine.propagate(secret.expose_secret(), &proof)?
        }
        None => {
            println!("Re-syncing current credential ({origin} source)");
            engine.sync_current()?
        }
    };

    print_report(&report);

    if let Some(path) = notes {
        let text = render_deployment_notes(&report, engine.artifacts(), &config.credential.env_var);
        std::fs::write(path, text).map_err(|e| {
            LockstepError::Internal(format!(
                "failed to write deployment notes to {}: {e}",
                path.display()
            ))
        })?;
        info!(path = %path.display(), "deployment notes written");
        println!("Deployment notes: {}", path.display());
    }

    Ok(report)
}

fn print_report(report: &PropagationReport) {
    println!(
        "Fingerprint: {}  (version {})",
        report.new_fingerprint, report.version
    );
    println!(
        "Previous secret: {}",
        mask_secret(report.old_secret.expose_secret())
    );
    for outcome in &report.results {
        let mark = if outcome.success { "ok  " } else { "skip" };
        println!(
            "  [{mark}] {} ({}): {}",
            outcome.label,
            outcome.path.display(),
            outcome.detail
        );
    }
    println!(
        "{} of {} artifacts updated",
        report.success_count,
        report.results.len()
    );
}

fn prompt_new_secret() -> Result<SecretString, LockstepError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(LockstepError::Config(
            "--prompt needs an interactive terminal; pass the secret as an argument instead"
                .to_string(),
        ));
    }
    eprint!("New secret: ");
    let first = rpassword::read_password()
        .map_err(|e| LockstepError::Internal(format!("failed to read secret: {e}")))?;
    eprint!("Confirm new secret: ");
    let second = rpassword::read_password()
        .map_err(|e| LockstepError::Internal(format!("failed to read secret: {e}")))?;

    if first != second {
        return Err(LockstepError::InvalidSecret("secrets do not match".to_string()));
    }
    if first.is_empty() {
        return Err(LockstepError::InvalidSecret("empty secret not allowed".to_string()));
    }
    Ok(SecretString::from(first))
}

#[cfg(test)]
mod tests {
    use lockstep_config::model::ArtifactConfig;

    use super::*;

    fn config_in(dir: &Path) -> LockstepConfig {
        let source = dir.join("master.js");
        let proxy = dir.join("proxy.js");
        std::fs::write(&source, "auth: { password: 'admin123' }").unwrap();
        std::fs::write(&proxy, "const FIXED_PASSWORD = 'admin123';").unwrap();

        let mut config = LockstepConfig::default();
        config.credential.source_path = Some(source.display().to_string());
        config.artifacts.push(ArtifactConfig {
            label: "edge proxy".to_string(),
            path: proxy.display().to_string(),
            pattern: r#"const\s+FIXED_PASSWORD\s*=\s*['"`]([^'"`]+)['"`]"#.to_string(),
        });
        config
    }

    #[test]
    fn sync_with_new_secret_rotates_everything() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let notes = dir.path().join("deployment-notes.txt");

        let report = run_sync(&config, Some("newpass1".to_string()), false, Some(&notes)).unwrap();
        assert_eq!(report.success_count, 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("proxy.js")).unwrap(),
            "const FIXED_PASSWORD = 'newpass1';"
        );

        let notes = std::fs::read_to_string(notes).unwrap();
        assert!(notes.contains(report.new_fingerprint.as_str()));
        assert!(!notes.contains("newpass1"));
    }

    #[test]
    fn sync_without_secret_repairs_stale_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(dir.path().join("proxy.js"), "const FIXED_PASSWORD = 'old';").unwrap();

        let report = run_sync(&config, None, false, None).unwrap();
        assert_eq!(report.version, 1);
        assert!(!report.results[0].success);
        assert!(report.results[1].success);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("proxy.js")).unwrap(),
            "const FIXED_PASSWORD = 'admin123';"
        );
    }

    #[test]
    fn weak_secret_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(matches!(
            run_sync(&config, Some("abc".to_string()), false, None),
            Err(LockstepError::WeakSecret { .. })
        ));
    }
}
