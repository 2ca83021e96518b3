// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verification sessions for the Lockstep credential service.
//!
//! A session records that its holder verified against the credential and
//! stays valid until its TTL elapses or the credential rotates.

pub mod authority;
pub mod limiter;
pub mod session;
pub mod store;

pub use authority::SessionAuthority;
pub use limiter::AttemptLimiter;
pub use session::{Session, classify_at, is_session_valid, is_session_valid_at};
pub use store::{FileSessionStore, MemorySessionStore};
