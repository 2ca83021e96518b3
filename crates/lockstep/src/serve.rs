// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockstep serve` command implementation.

use lockstep_config::LockstepConfig;
use lockstep_core::{LockstepError, RecordOrigin};
use lockstep_gateway::{GatewayState, start_server};
use tracing::{info, warn};

use crate::bootstrap;

/// Build every component and serve the gateway until Ctrl-C.
pub async fn run_serve(config: LockstepConfig) -> Result<(), LockstepError> {
    let components = bootstrap::build(&config)?;
    if components.origin == RecordOrigin::Fallback {
        warn!("serving with the compiled fallback credential; rotate it before exposing the gateway");
    }
    info!(
        artifacts = components.engine.artifacts().len(),
        host = %config.gateway.host,
        port = config.gateway.port,
        "lockstep serve starting"
    );

    let state = GatewayState::new(components.engine, components.sessions, components.relay);
    start_server(&config.gateway, state, shutdown_signal()).await?;

    info!("lockstep serve shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
