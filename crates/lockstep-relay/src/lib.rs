// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication of requests forwarded through the internal relay.

pub mod authenticator;
pub mod middleware;
pub mod token;

pub use authenticator::{RelayAuthenticator, RelayParams};
pub use middleware::relay_auth_middleware;
pub use token::{AUTH_PARAM, TIME_PARAM, check_token, sign, sign_at, validate};
