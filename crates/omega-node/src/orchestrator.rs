//! Generation orchestrator.
//!
//! Runs one generation cycle: validate the brief, ask the provider, normalize
//! its answer and, whenever the provider path fails, degrade to the local
//! summarizer. The outcome is committed to the caller's session store.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use omega_core::{
    summarize, ErrorInfo, GenerationResult, OmegaError, ProviderKind, Result, ThemeSelection,
};
use omega_provider::{normalize, ErrorClass, HttpTransport, ProviderClient, ProviderError};
use omega_state::{SessionDeckState, SessionStore};
use tracing::{debug, info, warn};

use crate::config::NodeConfig;

/// Code reported when the provider answered with no slides.
pub const EMPTY_OUTLINE: &str = "EMPTY_OUTLINE";

/// Lifecycle of one generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Requesting,
    Succeeded,
    FellBack,
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationPhase::Idle => "idle",
            GenerationPhase::Requesting => "requesting",
            GenerationPhase::Succeeded => "succeeded",
            GenerationPhase::FellBack => "fell-back",
        };
        f.write_str(name)
    }
}

impl GenerationPhase {
    /// Log the move to `next`. A tracing aid only; no transition rules are enforced.
    fn advance(self, next: GenerationPhase) -> GenerationPhase {
        debug!("Generation {} -> {}", self, next);
        next
    }

    /// Terminal phase for a finished result.
    pub fn of(result: &GenerationResult) -> GenerationPhase {
        if result.provider.is_fallback() {
            GenerationPhase::FellBack
        } else {
            GenerationPhase::Succeeded
        }
    }
}

/// Drives brief-to-deck generation.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    /// `None` when no API key is configured.
    provider: Option<ProviderClient>,
}

impl GenerationOrchestrator {
    pub fn new(provider: Option<ProviderClient>) -> Self {
        Self { provider }
    }

    /// Build the orchestrator for a node; the provider is only wired when a key exists.
    pub fn from_config(config: &NodeConfig) -> Self {
        let provider = config.api_key.as_ref().map(|key| {
            let transport = HttpTransport::new(&config.base_url, key.clone());
            ProviderClient::new(Arc::new(transport), &config.provider)
        });
        if provider.is_none() {
            warn!("No provider API key configured; decks will be drafted locally");
        }
        Self::new(provider)
    }

    /// Produce a deck for `brief`. Only an empty brief is an error.
    pub async fn generate(&self, brief: &str, theme: &ThemeSelection) -> Result<GenerationResult> {
        let brief = brief.trim();
        if brief.is_empty() {
            return Err(OmegaError::BriefRequired);
        }

        let phase = GenerationPhase::Idle.advance(GenerationPhase::Requesting);

        let result = match &self.provider {
            None => GenerationResult::fell_back(
                ProviderKind::Fallback,
                summarize(brief),
                ErrorInfo::from(&OmegaError::MissingApiKey),
            ),
            Some(provider) => match provider.generate(brief, theme).await {
                Ok(output) => {
                    let deck = normalize(&output.deck, brief);
                    if deck.is_empty() {
                        warn!("Provider model {} returned an empty outline", output.model_used);
                        let info = ErrorInfo::new("Provider returned an empty outline.", EMPTY_OUTLINE)
                            .with_model(Some(output.model_used));
                        GenerationResult::fell_back(ProviderKind::Fallback, summarize(brief), info)
                    } else {
                        GenerationResult::succeeded(deck, output.model_used, output.raw)
                    }
                }
                Err(err) => {
                    warn!("Provider generation failed ({}): {}", err.code(), err);
                    GenerationResult::fell_back(fallback_kind(&err), summarize(brief), error_info(&err))
                }
            },
        };

        let phase = phase.advance(GenerationPhase::of(&result));
        info!(
            "Generated {} slides via {} ({})",
            result.deck.len(),
            result.provider,
            phase
        );
        phase.advance(GenerationPhase::Idle);
        Ok(result)
    }

    /// Generate and commit the outcome to `store`.
    ///
    /// The returned state is what this cycle produced; it is only visible in
    /// the store if no newer cycle started in the meantime.
    pub async fn run(
        &self,
        store: &SessionStore,
        brief: &str,
        theme: ThemeSelection,
    ) -> Result<SessionDeckState> {
        if brief.trim().is_empty() {
            return Err(OmegaError::BriefRequired);
        }

        let ticket = store.begin().await;
        let result = self.generate(brief, &theme).await?;
        let state = SessionDeckState::from_generation(brief.trim(), theme, result, Utc::now());

        if !store.replace(ticket, state.clone()).await {
            info!("Generation {} superseded before commit", ticket.sequence());
        }
        Ok(state)
    }
}

/// Unreachable providers are reported as a client-side fallback.
fn fallback_kind(err: &ProviderError) -> ProviderKind {
    match err.class() {
        ErrorClass::Transport => ProviderKind::FallbackClient,
        _ => ProviderKind::Fallback,
    }
}

fn error_info(err: &ProviderError) -> ErrorInfo {
    ErrorInfo::from(&OmegaError::from(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use omega_provider::{ProviderConfig, ResponsesRequest, ResponsesTransport, TransportResponse};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const BUDGET_BRIEF: &str =
        "Launch a budgeting app. Target young professionals. Freemium pricing.";

    /// Answers every request the same way and counts calls.
    struct FixedTransport {
        answer: std::result::Result<TransportResponse, ProviderError>,
        calls: AtomicUsize,
    }

    impl FixedTransport {
        fn new(answer: std::result::Result<TransportResponse, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ResponsesTransport for FixedTransport {
        async fn send(
            &self,
            _request: &ResponsesRequest,
        ) -> omega_provider::Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    /// Holds its answer until released.
    struct GatedTransport {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ResponsesTransport for GatedTransport {
        async fn send(
            &self,
            _request: &ResponsesRequest,
        ) -> omega_provider::Result<TransportResponse> {
            self.started.notify_one();
            self.release.notified().await;
            deck_answer(json!({ "slides": [{ "title": "Slow" }] }))
        }
    }

    fn deck_answer(payload: serde_json::Value) -> omega_provider::Result<TransportResponse> {
        Ok(TransportResponse {
            status: 200,
            reason: Some("OK".into()),
            body: Some(json!({
                "id": "resp_1",
                "output": [{ "content": [{ "type": "output_text", "text": payload.to_string() }] }]
            })),
        })
    }

    fn orchestrator(transport: Arc<dyn ResponsesTransport>) -> GenerationOrchestrator {
        GenerationOrchestrator::new(Some(ProviderClient::new(
            transport,
            &ProviderConfig::default(),
        )))
    }

    #[tokio::test]
    async fn test_empty_brief_rejected_before_any_call() {
        let transport = FixedTransport::new(deck_answer(json!({})));
        let orchestrator = orchestrator(transport.clone());
        let store = SessionStore::new();

        let err = orchestrator
            .run(&store, "   ", ThemeSelection::Default)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "BRIEF_REQUIRED");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_drafts_locally() {
        let result = GenerationOrchestrator::new(None)
            .generate(BUDGET_BRIEF, &ThemeSelection::Default)
            .await
            .unwrap();
        assert_eq!(result.provider, ProviderKind::Fallback);
        assert_eq!(result.error.unwrap().code, "MISSING_PROVIDER_API_KEY");
        assert_eq!(result.deck.outline[0], "Opening");
    }

    #[tokio::test]
    async fn test_unreachable_provider_falls_back_client_side() {
        let transport = FixedTransport::new(Err(ProviderError::Transport {
            message: "connection refused".into(),
            model: Some("gpt-4o-mini".into()),
        }));
        let result = orchestrator(transport.clone())
            .generate(BUDGET_BRIEF, &ThemeSelection::Default)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderKind::FallbackClient);
        assert_eq!(result.deck.outline[0], "Opening");
        assert_eq!(result.deck.insights.len(), 3);
        assert!((6..=10).contains(&result.deck.len()));
        let error = result.error.unwrap();
        assert_eq!(error.code, "TRANSPORT_ERROR");
        assert_eq!(error.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces_code() {
        let transport = FixedTransport::new(Ok(TransportResponse {
            status: 401,
            reason: Some("Unauthorized".into()),
            body: Some(json!({ "error": { "message": "Incorrect API key", "code": "invalid_api_key" } })),
        }));
        let result = orchestrator(transport)
            .generate("Quarterly review", &ThemeSelection::Default)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderKind::Fallback);
        let error = result.error.unwrap();
        assert_eq!(error.code, "invalid_api_key");
        assert_eq!(error.message, "Provider API error (401): Incorrect API key");
    }

    #[tokio::test]
    async fn test_provider_deck_normalized() {
        let transport = FixedTransport::new(deck_answer(json!({
            "slides": [{ "title": "Hook", "keyPoints": ["A", "B", "C", "D", "E", "F"] }],
            "speakerNotes": ["Lead with the pain point"]
        })));
        let result = orchestrator(transport)
            .generate("Pitch", &ThemeSelection::BuiltInExample)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderKind::Provider);
        assert!(result.error.is_none());
        assert_eq!(result.model_used.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(result.deck.slides[0].bullets.len(), 5);
        assert_eq!(result.deck.slides[0].display_title, "1. Hook");
        assert_eq!(result.deck.insights, vec!["Lead with the pain point"]);
        assert_eq!(result.raw_provider_response.unwrap()["id"], "resp_1");
    }

    #[tokio::test]
    async fn test_empty_outline_falls_back() {
        let transport = FixedTransport::new(deck_answer(json!({ "slides": [] })));
        let result = orchestrator(transport)
            .generate("Pitch deck. For investors.", &ThemeSelection::Default)
            .await
            .unwrap();

        assert_eq!(result.provider, ProviderKind::Fallback);
        let error = result.error.unwrap();
        assert_eq!(error.code, EMPTY_OUTLINE);
        assert_eq!(error.model.as_deref(), Some("gpt-4o-mini"));
        assert!(!result.deck.is_empty());
    }

    #[tokio::test]
    async fn test_run_commits_to_store() {
        let store = SessionStore::new();
        let state = GenerationOrchestrator::new(None)
            .run(&store, "  Team offsite  ", ThemeSelection::BuiltInExample)
            .await
            .unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot, state);
        assert_eq!(snapshot.brief, "Team offsite");
        assert_eq!(snapshot.theme, ThemeSelection::BuiltInExample);
        assert!(snapshot.generated_at.is_some());
    }

    #[tokio::test]
    async fn test_latest_started_generation_wins() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let slow = orchestrator(Arc::new(GatedTransport {
            started: started.clone(),
            release: release.clone(),
        }));
        let store = Arc::new(SessionStore::new());

        let slow_run = tokio::spawn({
            let store = store.clone();
            async move { slow.run(&store, "Slow brief", ThemeSelection::Default).await }
        });
        started.notified().await;

        GenerationOrchestrator::new(None)
            .run(&store, "Fast brief", ThemeSelection::Default)
            .await
            .unwrap();
        release.notify_one();

        let slow_state = slow_run.await.unwrap().unwrap();
        assert_eq!(slow_state.provider, Some(ProviderKind::Provider));
        assert_eq!(store.snapshot().await.brief, "Fast brief");
    }
}
