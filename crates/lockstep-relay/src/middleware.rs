// SPDX-FileCopyrightText: 2026 Lockstep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! axum middleware guarding relay routes with a proxy auth token.

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::authenticator::{RelayAuthenticator, RelayParams};

/// Rejects requests whose `auth`/`t` query parameters do not form a valid token.
///
/// Every rejection is a bare 401; the reason is logged at debug level only.
pub async fn relay_auth_middleware(
    State(relay): State<Arc<RelayAuthenticator>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let params = Query::<RelayParams>::try_from_uri(request.uri())
        .map(|Query(params)| params)
        .unwrap_or_default();

    match relay.check(&params) {
        Ok(()) => Ok(next.run(request).await),
        Err(e) => {
            tracing::debug!(reason = %e, path = %request.uri().path(), "relay request rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, middleware, routing::get};
    use lockstep_credential::{CredentialRecord, SharedCredential, digest};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let credential = SharedCredential::new(CredentialRecord::new("admin123").unwrap());
        let relay = Arc::new(RelayAuthenticator::new(
            credential,
            std::time::Duration::from_secs(600),
        ));
        Router::new()
            .route("/proxy/{*rest}", get(|| async { "relayed" }))
            .layer(middleware::from_fn_with_state(relay, relay_auth_middleware))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn signed_request_passes() {
        let now = chrono::Utc::now().timestamp_millis();
        let uri = format!("/proxy/video?auth={}&t={now}", digest("admin123"));
        assert_eq!(status_of(&uri).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unsigned_request_is_unauthorized() {
        assert_eq!(status_of("/proxy/video").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn stale_request_is_unauthorized() {
        let stale = chrono::Utc::now().timestamp_millis() - 11 * 60 * 1000;
        let uri = format!("/proxy/video?auth={}&t={stale}", digest("admin123"));
        assert_eq!(status_of(&uri).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_fingerprint_is_unauthorized() {
        let now = chrono::Utc::now().timestamp_millis();
        let uri = format!("/proxy/video?auth={}&t={now}", digest("wrong"));
        assert_eq!(status_of(&uri).await, StatusCode::UNAUTHORIZED);
    }
}
