// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Lockstep credential service.
//!
//! Exposes credential verification, rotation, and status over
//! `POST /api/credential`, a health probe, and a relay token check for
//! reverse proxies that delegate authentication to a sub-request.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, router, start_server};
