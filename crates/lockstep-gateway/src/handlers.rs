// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway API.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use lockstep_core::{LockstepError, SessionState};
use lockstep_propagate::{ArtifactOutcome, PropagationReport};
use lockstep_session::Session;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Body of `POST /api/credential`.
///
/// The legacy `currentPassword`/`newPassword` field names are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    pub action: String,
    #[serde(default, alias = "currentPassword")]
    pub current_credential: Option<String>,
    #[serde(default, alias = "newPassword")]
    pub new_secret: Option<String>,
    /// Session blob previously returned by `verify`.
    #[serde(default)]
    pub session: Option<Session>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Session blob for the client to keep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub valid: bool,
    pub state: SessionState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub old_secret: String,
    pub new_fingerprint: String,
    pub version: u64,
    pub success_count: usize,
    pub per_artifact_results: Vec<ArtifactOutcome>,
    pub timestamp: DateTime<Utc>,
}

impl From<PropagationReport> for UpdateResponse {
    fn from(report: PropagationReport) -> Self {
        Self {
            success: true,
            old_secret: report.old_secret.expose_secret().to_string(),
            new_fingerprint: report.new_fingerprint.to_string(),
            version: report.version,
            success_count: report.success_count,
            per_artifact_results: report.results,
            timestamp: report.timestamp,
        }
    }
}

/// Plaintext exposure is intended: the service has a single operator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub current_secret: String,
    pub current_fingerprint: String,
    pub artifact_count: usize,
    pub version: u64,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
        }),
    )
        .into_response()
}

fn internal_error(err: impl std::fmt::Display) -> Response {
    tracing::error!(error = %err, "credential request failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// POST /api/credential
///
/// Dispatches on `action`: `verify`, `session`, `update`, or `status`.
pub async fn post_credential(
    State(state): State<GatewayState>,
    body: Result<Json<CredentialRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match request.action.as_str() {
        "verify" => verify(state, request).await,
        "session" => session(&state, request),
        "update" => update(state, request).await,
        "status" => status(&state),
        other => error_response(StatusCode::BAD_REQUEST, format!("unknown action: {other}")),
    }
}

async fn verify(state: GatewayState, request: CredentialRequest) -> Response {
    let candidate = request.current_credential.unwrap_or_default();
    let sessions = state.sessions.clone();
    let outcome = match tokio::task::spawn_blocking(move || sessions.grant(&candidate)).await {
        Ok(outcome) => outcome,
        Err(e) => return internal_error(e),
    };

    match outcome {
        Ok(session) => Json(VerifyResponse {
            valid: true,
            error: None,
            session: Some(session),
        })
        .into_response(),
        Err(e @ LockstepError::Unauthorized) => Json(VerifyResponse {
            valid: false,
            error: Some(e.to_string()),
            session: None,
        })
        .into_response(),
        Err(e @ LockstepError::LockedOut { .. }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(VerifyResponse {
                valid: false,
                error: Some(e.to_string()),
                session: None,
            }),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

fn session(state: &GatewayState, request: CredentialRequest) -> Response {
    let Some(session) = request.session else {
        return Json(SessionResponse {
            valid: false,
            state: SessionState::Unverified,
        })
        .into_response();
    };
    match state.sessions.classify(&session) {
        Ok(session_state) => Json(SessionResponse {
            valid: session_state == SessionState::Verified,
            state: session_state,
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

async fn update(state: GatewayState, request: CredentialRequest) -> Response {
    let proof = request.current_credential.unwrap_or_default();
    let new_secret = request.new_secret.unwrap_or_default();
    let engine = state.engine.clone();
    let sessions = state.sessions.clone();

    let outcome = tokio::task::spawn_blocking(move || -> Result<PropagationReport, LockstepError> {
        let limiter = sessions.limiter();
        limiter.check()?;
        match engine.propagate(&new_secret, &proof) {
            Ok(report) => {
                limiter.record_success()?;
                Ok(report)
            }
            Err(LockstepError::Unauthorized) => {
                limiter.record_failure()?;
                Err(LockstepError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    })
    .await;

    match outcome {
        Ok(Ok(report)) => {
            tracing::info!(
                success_count = report.success_count,
                artifacts = report.results.len(),
                "credential updated via gateway"
            );
            Json(UpdateResponse::from(report)).into_response()
        }
        Ok(Err(e @ LockstepError::LockedOut { .. })) => {
            error_response(StatusCode::TOO_MANY_REQUESTS, e.to_string())
        }
        Ok(Err(e)) if e.is_precondition() => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Ok(Err(e)) => internal_error(e),
        Err(e) => internal_error(e),
    }
}

fn status(state: &GatewayState) -> Response {
    match state.engine.credential().snapshot() {
        Ok(record) => Json(StatusResponse {
            success: true,
            current_secret: record.secret().to_string(),
            current_fingerprint: record.fingerprint().to_string(),
            artifact_count: state.engine.artifacts().len(),
            version: record.version(),
            last_updated: record.last_updated(),
        })
        .into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /api/relay/validate
///
/// Reached only when the relay middleware accepted the token.
pub async fn get_relay_validate() -> StatusCode {
    StatusCode::NO_CONTENT
}
