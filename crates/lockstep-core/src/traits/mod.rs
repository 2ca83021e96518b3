// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the credential core and its collaborators.

pub mod session_store;

pub use session_store::SessionStore;
