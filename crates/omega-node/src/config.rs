//! Node configuration from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use omega_provider::ProviderConfig;
use omega_state::SessionLimits;
use tracing::warn;

/// Default Responses API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_PORT: u16 = 3000;

/// Default request body cap; uploaded templates travel base64-encoded in JSON.
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Runtime configuration of the node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,

    /// Provider API key; generation falls back locally without one.
    pub api_key: Option<String>,

    /// Base URL of the provider API.
    pub base_url: String,

    /// Model candidates and per-attempt deadline.
    pub provider: ProviderConfig,

    /// Largest accepted request body.
    pub max_body_bytes: usize,

    /// Idle expiry and capacity of the session registry.
    pub sessions: SessionLimits,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            provider: ProviderConfig::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            sessions: SessionLimits::default(),
        }
    }
}

impl NodeConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT);
        let ip = parse_or(get("OMEGA_BIND"), "OMEGA_BIND", defaults.addr.ip());

        let mut provider = defaults.provider;
        provider.model = get("OPENAI_MODEL");
        if let Some(list) = get("OMEGA_FALLBACK_MODELS") {
            provider.fallback_models = list
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }
        let secs = parse_or(
            get("OMEGA_ATTEMPT_TIMEOUT_SECS"),
            "OMEGA_ATTEMPT_TIMEOUT_SECS",
            provider.attempt_timeout.as_secs(),
        );
        if secs == 0 {
            warn!("OMEGA_ATTEMPT_TIMEOUT_SECS must be positive, keeping default");
        } else {
            provider.attempt_timeout = Duration::from_secs(secs);
        }

        let mut sessions = defaults.sessions;
        let ttl = parse_or(
            get("OMEGA_SESSION_TTL_SECS"),
            "OMEGA_SESSION_TTL_SECS",
            sessions.idle_ttl.as_secs(),
        );
        sessions.idle_ttl = Duration::from_secs(ttl);
        let max_sessions = parse_or(get("OMEGA_MAX_SESSIONS"), "OMEGA_MAX_SESSIONS", sessions.max_sessions);
        if max_sessions == 0 {
            warn!("OMEGA_MAX_SESSIONS must be positive, keeping default");
        } else {
            sessions.max_sessions = max_sessions;
        }

        Self {
            addr: SocketAddr::new(ip, port),
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            provider,
            max_body_bytes: parse_or(
                get("OMEGA_MAX_BODY_BYTES"),
                "OMEGA_MAX_BODY_BYTES",
                defaults.max_body_bytes,
            ),
            sessions,
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} value {:?}, using default", key, raw);
            default
        }),
    }
}
