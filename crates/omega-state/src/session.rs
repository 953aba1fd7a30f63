//! Session-scoped deck state.
//!
//! Each client session owns one [`SessionStore`]. The generation pipeline is
//! the only writer and replaces the whole state at a single commit point;
//! readers only ever see deep-copy snapshots.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use omega_core::{Deck, ErrorInfo, GenerationResult, ProviderKind, ThemeSelection};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::diagnostics::cap_diagnostic;

/// Session id used when a client does not name one.
pub const DEFAULT_SESSION: &str = "default";

/// Latest generation outcome for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDeckState {
    pub brief: String,
    pub deck: Deck,
    pub theme: ThemeSelection,

    /// `None` until a generation has been committed.
    pub provider: Option<ProviderKind>,
    pub model_used: Option<String>,

    /// Capped diagnostic copy of the provider answer.
    pub raw_provider_response: Option<serde_json::Value>,
    pub last_error: Option<ErrorInfo>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl SessionDeckState {
    /// State for a finished generation cycle.
    pub fn from_generation(
        brief: impl Into<String>,
        theme: ThemeSelection,
        result: GenerationResult,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            brief: brief.into(),
            deck: result.deck,
            theme,
            provider: Some(result.provider),
            model_used: result.model_used,
            raw_provider_response: result.raw_provider_response.map(cap_diagnostic),
            last_error: result.error,
            generated_at: Some(generated_at),
        }
    }

    /// Check if no deck has been generated.
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }
}

/// Ticket handed out when a generation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

struct SessionInner {
    state: SessionDeckState,
    latest_ticket: u64,
}

/// Single-session store accessed through `replace` and `snapshot`.
///
/// Overlapping generations resolve to the most recently started one: a
/// commit carrying an older ticket than the newest issued is discarded.
pub struct SessionStore {
    inner: RwLock<SessionInner>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SessionInner {
                state: SessionDeckState::default(),
                latest_ticket: 0,
            }),
        }
    }

    /// Mark the start of a generation cycle.
    pub async fn begin(&self) -> GenerationTicket {
        let mut inner = self.inner.write().await;
        inner.latest_ticket += 1;
        GenerationTicket(inner.latest_ticket)
    }

    /// Replace the whole state. Returns false if a newer generation has started since `ticket`.
    pub async fn replace(&self, ticket: GenerationTicket, state: SessionDeckState) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.0 != inner.latest_ticket {
            warn!(
                "Discarding superseded generation {} (latest is {})",
                ticket.0, inner.latest_ticket
            );
            return false;
        }
        inner.state = state;
        debug!("Committed generation {}", ticket.0);
        true
    }

    /// Deep copy of the current state.
    pub async fn snapshot(&self) -> SessionDeckState {
        self.inner.read().await.state.clone()
    }

    /// Reset to the empty state; pending generations are superseded.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.latest_ticket += 1;
        inner.state = SessionDeckState::default();
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Default idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default cap on concurrently tracked sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Bounds on [`SessionRegistry`] growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Sessions untouched for longer than this are evicted.
    pub idle_ttl: Duration,

    /// When full, the least recently used session makes room.
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            idle_ttl: DEFAULT_SESSION_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

struct SessionEntry {
    store: Arc<SessionStore>,
    last_seen: Instant,
}

/// One [`SessionStore`] per session id, bounded by [`SessionLimits`].
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    limits: SessionLimits,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::default(),
            limits,
        }
    }

    /// Store for `id`, created on first use. Touching a session keeps it alive.
    pub async fn get_or_create(&self, id: &str) -> Arc<SessionStore> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(id) {
            entry.last_seen = now;
            return entry.store.clone();
        }

        self.evict(&mut sessions, now);
        let store = Arc::new(SessionStore::new());
        sessions.insert(
            id.to_string(),
            SessionEntry {
                store: store.clone(),
                last_seen: now,
            },
        );
        debug!("Created session {} ({} live)", id, sessions.len());
        store
    }

    /// Drop a session and its state; its pending generations are superseded.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(entry) => {
                entry.store.clear().await;
                true
            }
            None => false,
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn evict(&self, sessions: &mut HashMap<String, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.limits.idle_ttl);

        while sessions.len() >= self.limits.max_sessions.max(1) {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {} idle session(s)", evicted);
        }
    }
}
