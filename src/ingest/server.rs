//! axum server for result ingestion and relayed gateway events.
//!
//! Routes:
//! - `GET /health` returns `ok`.
//! - `POST /match` takes a finished-match payload and runs the correlator.
//! - `POST /gateway/events` takes one [`PlatformEvent`] and returns the
//!   ephemeral reply for the acting user.
//!
//! When an ingestion secret is configured both POST routes require a valid
//! `x-signature` header.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::signature::{self, SIGNATURE_HEADER};
use crate::models::result::MatchResult;
use crate::orchestrator::correlator;
use crate::platform::events::{self, PlatformEvent};
use crate::state::AppState;
use crate::{AppError, Result};

/// Handler for `GET /health`.
async fn health() -> &'static str {
    "ok"
}

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/match", post(ingest_match))
        .route("/gateway/events", post(gateway_event))
        .with_state(state)
}

fn rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Check the signature (when a secret is configured) and decode the body.
fn authorize_and_decode<T: DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> std::result::Result<T, Response> {
    if let Some(ref secret) = state.config.ingest_secret {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        if let Err(err) = signature::verify(secret.as_bytes(), body, header) {
            warn!(%err, "unsigned or mis-signed delivery rejected");
            return Err(rejection(StatusCode::UNAUTHORIZED, "invalid signature"));
        }
    }
    serde_json::from_slice(body).map_err(|err| {
        warn!(%err, "malformed delivery rejected");
        rejection(StatusCode::BAD_REQUEST, &format!("malformed body: {err}"))
    })
}

async fn ingest_match(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let result: MatchResult = match authorize_and_decode(&state, &headers, &body) {
        Ok(result) => result,
        Err(response) => return response,
    };
    if result.players.is_empty() {
        return rejection(StatusCode::BAD_REQUEST, "players must not be empty");
    }

    match correlator::ingest(&state, &result).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(AppError::DuplicateResult(_)) => {
            (StatusCode::OK, Json(json!({ "status": "duplicate" }))).into_response()
        }
        Err(err) => {
            error!(%err, "result ingestion failed");
            rejection(StatusCode::INTERNAL_SERVER_ERROR, "ingestion failed")
        }
    }
}

async fn gateway_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event: PlatformEvent = match authorize_and_decode(&state, &headers, &body) {
        Ok(event) => event,
        Err(response) => return response,
    };
    let reply = events::dispatch(&state, event).await;
    (StatusCode::OK, Json(reply)).into_response()
}

/// Serve HTTP on `config.http_port` until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Io` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = SocketAddr::from(([0, 0, 0, 0], state.config.http_port));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Io(format!("failed to bind {bind}: {err}")))?;

    info!(%bind, "starting HTTP ingestion server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(format!("http server error: {err}")))?;

    info!("HTTP ingestion server shut down");
    Ok(())
}
