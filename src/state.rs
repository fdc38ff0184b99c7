//! Process-wide shared state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::backend::Backend;
use crate::config::GlobalConfig;
use crate::orchestrator::ban_tracker::BanTracker;
use crate::orchestrator::correlator::DedupGuard;
use crate::orchestrator::registry::SessionRegistry;
use crate::platform::ChatPlatform;

/// Shared application state handed to every handler and background task.
///
/// Created once at startup and dropped at shutdown. In-flight sessions and
/// strike counts live only here.
pub struct AppState {
    /// Global configuration.
    pub config: Arc<GlobalConfig>,
    /// Chat-platform adapter.
    pub platform: Arc<dyn ChatPlatform>,
    /// Persistence collaborator.
    pub backend: Arc<dyn Backend>,
    /// Active sessions keyed by backend id.
    pub registry: SessionRegistry,
    /// Strike counts per user.
    pub bans: BanTracker,
    /// Recently seen result signatures.
    pub dedup: DedupGuard,
    /// Root token; every timer and sweep runs on a child of it.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Assemble state with empty registries.
    #[must_use]
    pub fn new(
        config: Arc<GlobalConfig>,
        platform: Arc<dyn ChatPlatform>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            config,
            platform,
            backend,
            registry: SessionRegistry::default(),
            bans: BanTracker::default(),
            dedup: DedupGuard::default(),
            shutdown: CancellationToken::new(),
        }
    }
}
