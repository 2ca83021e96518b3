// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side persistent key/value store holding serialized sessions.

use crate::error::LockstepError;

/// A string key/value store in the shape of a browser's local storage.
///
/// Values are opaque serialized blobs; the session authority owns the format.
pub trait SessionStore: Send + Sync {
    /// Returns the stored value for `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, LockstepError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), LockstepError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), LockstepError>;
}
