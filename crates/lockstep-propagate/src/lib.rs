// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Propagation of the Lockstep credential into dependent artifacts.
//!
//! A rotation verifies the caller against the current credential, updates the
//! shared record, and then rewrites every configured artifact, reporting each
//! outcome independently.

pub mod artifact;
pub mod engine;
pub mod notes;
pub mod report;

pub use artifact::{ArtifactSpec, PRIMARY_SOURCE_LABEL, Substitution, substitute};
pub use engine::PropagationEngine;
pub use notes::render_deployment_notes;
pub use report::{ArtifactOutcome, PropagationReport};
