//! Application state.

use std::sync::Arc;

use axum::http::HeaderMap;
use omega_state::{SessionRegistry, SessionStore, DEFAULT_SESSION};

use crate::config::NodeConfig;
use crate::orchestrator::GenerationOrchestrator;

/// Header naming the caller's session.
pub const SESSION_HEADER: &str = "x-omega-session";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Node configuration.
    pub config: Arc<NodeConfig>,

    /// The generation pipeline.
    pub orchestrator: Arc<GenerationOrchestrator>,

    /// Deck state per client session.
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Create the state for `config`.
    pub fn new(config: NodeConfig) -> Self {
        let orchestrator = GenerationOrchestrator::from_config(&config);
        Self::with_orchestrator(config, orchestrator)
    }

    pub fn with_orchestrator(config: NodeConfig, orchestrator: GenerationOrchestrator) -> Self {
        Self {
            sessions: SessionRegistry::with_limits(config.sessions),
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Session store for the request, keyed by [`SESSION_HEADER`].
    pub async fn session(&self, headers: &HeaderMap) -> Arc<SessionStore> {
        self.sessions.get_or_create(session_id(headers)).await
    }

    /// Forget the request's session. Generations still running for it will not commit.
    pub async fn end_session(&self, headers: &HeaderMap) -> bool {
        self.sessions.remove(session_id(headers)).await
    }
}

fn session_id(headers: &HeaderMap) -> &str {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_SESSION)
}
