// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup wiring: configuration, then the credential record, then the
//! components that share it.

use std::sync::Arc;

use lockstep_config::LockstepConfig;
use lockstep_core::{LockstepError, RecordOrigin};
use lockstep_credential::{SharedCredential, load_record, mask_secret};
use lockstep_propagate::PropagationEngine;
use lockstep_relay::RelayAuthenticator;
use lockstep_session::SessionAuthority;
use tracing::info;

/// The components of a running service, all sharing one credential handle.
pub struct Components {
    pub origin: RecordOrigin,
    pub engine: Arc<PropagationEngine>,
    pub sessions: Arc<SessionAuthority>,
    pub relay: Arc<RelayAuthenticator>,
}

/// Load the credential record, logging its source.
pub fn load_credential(
    config: &LockstepConfig,
) -> Result<(SharedCredential, RecordOrigin), LockstepError> {
    let loaded = load_record(&config.credential)?;
    info!(
        origin = %loaded.origin,
        secret = %mask_secret(loaded.record.secret()),
        fingerprint = loaded.record.fingerprint().short(),
        "credential loaded"
    );
    Ok((SharedCredential::new(loaded.record), loaded.origin))
}

/// Build every component around a freshly loaded credential.
pub fn build(config: &LockstepConfig) -> Result<Components, LockstepError> {
    let (credential, origin) = load_credential(config)?;
    let engine = PropagationEngine::from_config(credential.clone(), config)?;
    let sessions = SessionAuthority::from_config(credential.clone(), &config.session)?;
    let relay = RelayAuthenticator::from_config(credential.clone(), &config.relay);
    Ok(Components {
        origin,
        engine: Arc::new(engine),
        sessions: Arc::new(sessions),
        relay: Arc::new(relay),
    })
}

/// `lockstep sign <URL>`
pub fn sign_url(config: &LockstepConfig, url: &str) -> Result<String, LockstepError> {
    let (credential, _) = load_credential(config)?;
    RelayAuthenticator::from_config(credential, &config.relay).sign(url)
}
