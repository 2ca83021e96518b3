// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lockstep credential service.
//!
//! This crate provides the error taxonomy, the small shared enums, and the
//! store trait that the credential, propagation, and session crates build on.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LockstepError;
pub use traits::SessionStore;
pub use types::{ArtifactErrorKind, RecordOrigin, SessionState};
