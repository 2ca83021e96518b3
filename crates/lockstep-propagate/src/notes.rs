// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text deployment notes written after a sync.

use std::fmt::Write;

use crate::artifact::ArtifactSpec;
use crate::report::PropagationReport;

/// Render operator notes for a completed pass.
///
/// The plaintext secret is never included; operators identify the credential
/// by fingerprint.
pub fn render_deployment_notes(
    report: &PropagationReport,
    artifacts: &[ArtifactSpec],
    env_var: &str,
) -> String {
    let mut notes = String::new();
    let _ = writeln!(notes, "# Lockstep deployment notes");
    let _ = writeln!(notes, "# Generated: {}", report.timestamp.to_rfc3339());
    let _ = writeln!(notes, "# Credential version: {}", report.version);
    let _ = writeln!(notes, "# Fingerprint (SHA-256): {}", report.new_fingerprint);
    let _ = writeln!(notes);

    let _ = writeln!(notes, "## Embedded credential");
    let _ = writeln!(
        notes,
        "The credential is written into these files; no environment variable is required:"
    );
    for spec in artifacts {
        let status = report
            .results
            .iter()
            .find(|r| r.path == spec.path)
            .map(|r| r.detail.as_str())
            .unwrap_or("not processed");
        let _ = writeln!(notes, "- {} ({}): {status}", spec.path.display(), spec.label);
    }
    let _ = writeln!(notes);

    let _ = writeln!(notes, "## Environment override (optional)");
    let _ = writeln!(
        notes,
        "When no primary source file is deployed, set {env_var} to the credential."
    );
    let _ = writeln!(
        notes,
        "Verify a deployed value with: lockstep digest <SECRET>  (expect {})",
        report.new_fingerprint.short()
    );
    notes
}
