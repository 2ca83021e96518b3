// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authoritative credential for the Lockstep service.
//!
//! One plaintext secret, its SHA-256 fingerprint, and the rules for deciding
//! whether caller input proves knowledge of it.

pub mod digest;
pub mod record;
pub mod shared;
pub mod source;
pub mod verify;

pub use digest::{FINGERPRINT_LEN, Fingerprint, digest, looks_like_fingerprint};
pub use record::{CredentialRecord, mask_secret};
pub use shared::SharedCredential;
pub use source::{LoadedCredential, load_record, load_record_with};
pub use verify::{MatchKind, verify, verify_detailed};
