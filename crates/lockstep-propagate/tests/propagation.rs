// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end rotation through configured artifacts.

use std::path::Path;

use lockstep_config::load_config_from_str;
use lockstep_core::ArtifactErrorKind;
use lockstep_credential::{SharedCredential, digest, load_record_with};
use lockstep_propagate::{PRIMARY_SOURCE_LABEL, PropagationEngine};

const ADMIN123: &str = "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

/// Configuration with a primary source and two artifacts, all embedding `admin123`.
fn setup(dir: &Path) -> (PropagationEngine, [String; 3]) {
    let source = write(
        dir,
        "master-config.js",
        "export const MASTER = { auth: { enabled: true, password: 'admin123' } };\n",
    );
    let auth = write(dir, "auth-config.js", "const AUTH = { password: \"admin123\" };\n");
    let proxy = write(dir, "proxy.js", "const FIXED_PASSWORD = 'admin123';\n");

    let toml = format!(
        r#"
[credential]
source_path = "{source}"

[[artifacts]]
label = "auth config"
path = "{auth}"

[[artifacts]]
label = "edge proxy"
path = "{proxy}"
pattern = '''const\s+FIXED_PASSWORD\s*=\s*['"`]([^'"`]+)['"`]'''
"#
    );
    let config = load_config_from_str(&toml).unwrap();
    let loaded = load_record_with(&config.credential, |_| None).unwrap();
    let engine = PropagationEngine::from_config(SharedCredential::new(loaded.record), &config)
        .unwrap();
    (engine, [source, auth, proxy])
}

#[test]
fn rotation_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, [source, auth, proxy]) = setup(dir.path());
    let credential = engine.credential().clone();

    assert_eq!(credential.fingerprint().unwrap().as_str(), ADMIN123);
    assert!(credential.verify("admin123"));
    assert!(credential.verify(ADMIN123));
    assert!(!credential.verify("wrong"));

    let report = engine.propagate("newpass1", "admin123").unwrap();
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.success_count, 3);
    assert_eq!(report.results[0].label, PRIMARY_SOURCE_LABEL);

    assert!(!credential.verify("admin123"));
    assert!(!credential.verify(ADMIN123));
    assert!(credential.verify("newpass1"));

    for path in [&source, &auth, &proxy] {
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("newpass1"), "{path} not rewritten");
        assert!(!content.contains("admin123"));
    }
    assert_eq!(
        std::fs::read_to_string(&proxy).unwrap(),
        "const FIXED_PASSWORD = 'newpass1';\n"
    );
}

#[test]
fn repeated_rotation_reports_no_change() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, _) = setup(dir.path());

    engine.propagate("newpass1", "admin123").unwrap();
    let second = engine.propagate("newpass1", "newpass1").unwrap();

    assert_eq!(second.success_count, 0);
    for outcome in &second.results {
        assert!(!outcome.success);
        assert_eq!(outcome.detail, "no change needed");
        assert_eq!(outcome.error, Some(ArtifactErrorKind::NoChange));
    }
    assert_eq!(second.version, 3);
}

#[test]
fn partial_failure_does_not_stop_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, [_, auth, proxy]) = setup(dir.path());

    std::fs::remove_file(&auth).unwrap();
    std::fs::remove_file(&proxy).unwrap();
    // A directory cannot be read as an artifact.
    std::fs::create_dir(&proxy).unwrap();

    let report = engine.propagate("newpass1", "admin123").unwrap();
    assert_eq!(report.success_count, 1);
    assert!(report.results[0].success);
    assert_eq!(report.results[1].error, Some(ArtifactErrorKind::NotFound));
    assert_eq!(report.results[1].detail, "artifact not found");
    assert_eq!(report.results[2].error, Some(ArtifactErrorKind::WriteFailure));
    assert_eq!(report.failures().count(), 2);

    assert!(engine.credential().verify("newpass1"));
    assert_eq!(report.new_fingerprint, digest("newpass1"));
}

#[test]
fn artifact_without_pattern_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, [_, auth, _]) = setup(dir.path());
    std::fs::write(&auth, "// credential moved elsewhere\n").unwrap();

    let report = engine.propagate("newpass1", "admin123").unwrap();
    assert_eq!(report.success_count, 2);
    assert_eq!(report.results[1].detail, "pattern not found");
    assert_eq!(
        report.results[1].error,
        Some(ArtifactErrorKind::PatternNotMatched)
    );
}

#[test]
fn rotated_secret_is_loaded_from_source_on_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, [source, _, _]) = setup(dir.path());
    engine.propagate("newpass1", "admin123").unwrap();

    let config = load_config_from_str(&format!("[credential]\nsource_path = \"{source}\"\n"))
        .unwrap();
    let reloaded = load_record_with(&config.credential, |_| None).unwrap();
    assert_eq!(reloaded.record.secret(), "newpass1");
}
