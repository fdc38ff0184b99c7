//! Result correlation.
//!
//! Matches a finished-match payload to the in-flight session whose member
//! set equals the payload's resolved player set, after discarding
//! duplicate deliveries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, info_span, Instrument};

use super::lifecycle;
use crate::backend::player_repo::PlayerRepo;
use crate::models::result::MatchResult;
use crate::state::AppState;
use crate::{AppError, Result};

/// Width of the time bucket folded into a result signature.
pub const BUCKET_SECONDS: i64 = 60;

/// How long a signature is remembered.
pub const DEDUP_TTL: Duration = Duration::from_secs(600);

/// Signature of a result: scores, sorted player names and a coarse time
/// bucket, hashed with SHA-256.
#[must_use]
pub fn result_signature(result: &MatchResult, received_at: DateTime<Utc>) -> String {
    let mut names = result.player_names();
    names.sort_unstable();
    let bucket = received_at.timestamp().div_euclid(BUCKET_SECONDS);

    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}|", result.score_blue, result.score_orange));
    hasher.update(names.join(","));
    hasher.update(format!("|{bucket}"));
    format!("{:x}", hasher.finalize())
}

/// Remembers recent result signatures.
#[derive(Debug)]
pub struct DedupGuard {
    seen: Mutex<HashMap<String, Instant>>,
    ttl: Duration,
}

impl Default for DedupGuard {
    fn default() -> Self {
        Self::with_ttl(DEDUP_TTL)
    }
}

impl DedupGuard {
    /// Guard that forgets signatures after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            seen: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Record `signature`, returning `false` if it was seen within the TTL.
    pub async fn check_and_record(&self, signature: &str) -> bool {
        let now = Instant::now();
        let mut seen = self.seen.lock().await;
        seen.retain(|_, at| now.duration_since(*at) < self.ttl);
        if seen.contains_key(signature) {
            return false;
        }
        seen.insert(signature.to_owned(), now);
        true
    }
}

/// What happened to an ingested result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// A session matched and entered its report window.
    Closed {
        /// The matched session.
        session_id: String,
    },
    /// No in-flight session has exactly these players.
    NoMatch,
}

/// Correlate a finished-match payload with an in-flight session.
///
/// # Errors
///
/// Returns `AppError::DuplicateResult` when the same result was already
/// processed inside the de-duplication window.
pub async fn ingest(state: &Arc<AppState>, result: &MatchResult) -> Result<IngestOutcome> {
    let signature = result_signature(result, Utc::now());
    let span = info_span!("ingest_result", signature = %signature);
    async move {
        if !state.dedup.check_and_record(&signature).await {
            info!("duplicate result discarded");
            return Err(AppError::DuplicateResult(signature.clone()));
        }

        let names = result.player_names();
        let resolved: HashSet<String> = PlayerRepo::new(Arc::clone(&state.backend))
            .resolve_names(&names)
            .await
            .into_iter()
            .collect();
        info!(
            players = names.len(),
            resolved = resolved.len(),
            "result players resolved"
        );

        let Some(session) = state.registry.claim_result(&resolved).await else {
            info!("result matches no active session");
            return Ok(IngestOutcome::NoMatch);
        };

        let session_id = session.id.clone();
        info!(session_id = %session_id, "result matched session");
        lifecycle::enter_report_window(state, session).await;
        Ok(IngestOutcome::Closed { session_id })
    }
    .instrument(span)
    .await
}
