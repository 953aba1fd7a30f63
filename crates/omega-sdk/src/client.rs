//! Omega client implementation.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use omega_core::{summarize, Deck, ErrorInfo, GenerationResult, ProviderKind, ThemeSelection};
use omega_state::{build_export_payload, SessionDeckState, SessionStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Result, SdkError};

/// Header naming the client's session on the node.
pub const SESSION_HEADER: &str = "x-omega-session";

/// Header carrying the exported file name.
pub const FILENAME_HEADER: &str = "x-omega-filename";

/// Client for an Omega node.
///
/// Keeps its own copy of the latest generation; [`OmegaClient::export`]
/// always exports that copy.
#[derive(Clone)]
pub struct OmegaClient {
    /// Base URL of the node.
    base_url: String,

    /// Session id sent with every request.
    session_id: String,

    /// Local deck state.
    session: Arc<SessionStore>,

    /// HTTP client.
    http_client: reqwest::Client,
}

/// A downloaded presentation.
#[derive(Debug, Clone)]
pub struct ExportedDeck {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    brief: &'a str,
    include_example_theme: bool,
    custom_theme: Option<&'a str>,
    custom_theme_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    provider: ProviderKind,
    deck: Deck,
    model_used: Option<String>,
    raw_model: Option<serde_json::Value>,
    error: Option<ErrorInfo>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorInfo,
}

impl OmegaClient {
    /// Create a client for the node at `url` with a fresh session.
    pub fn new(url: &str) -> Self {
        Self::with_session(url, Uuid::new_v4().to_string())
    }

    /// Create a client bound to an existing session id.
    pub fn with_session(url: &str, session_id: impl Into<String>) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            session_id: session_id.into(),
            session: Arc::new(SessionStore::new()),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Snapshot of the local deck state.
    pub async fn state(&self) -> SessionDeckState {
        self.session.snapshot().await
    }

    /// Generate a deck for `brief`.
    ///
    /// Never fails once the brief is valid: if the node cannot be used the
    /// deck is drafted locally and reported as `fallback-client`.
    pub async fn generate(&self, brief: &str, theme: &ThemeSelection) -> Result<SessionDeckState> {
        let brief = brief.trim();
        if brief.is_empty() {
            return Err(SdkError::BriefRequired);
        }

        let ticket = self.session.begin().await;
        let result = match self.request_deck(brief, theme).await {
            Ok(response) => GenerationResult {
                deck: response.deck,
                provider: response.provider,
                model_used: response.model_used,
                raw_provider_response: response.raw_model,
                error: response.error,
            },
            Err(e) => {
                warn!("Deck generation request failed: {}", e);
                GenerationResult::fell_back(
                    ProviderKind::FallbackClient,
                    summarize(brief),
                    ErrorInfo::new(e.to_string(), e.code()),
                )
            }
        };
        info!("Deck ready via {}", result.provider);

        let state = SessionDeckState::from_generation(brief, theme.clone(), result, Utc::now());
        self.session.replace(ticket, state.clone()).await;
        Ok(state)
    }

    async fn request_deck(&self, brief: &str, theme: &ThemeSelection) -> Result<GenerateResponse> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            brief,
            include_example_theme: theme.is_theme_aware(),
            custom_theme: theme.custom_data(),
            custom_theme_name: theme.custom_name(),
        };

        let response = self
            .http_client
            .post(&url)
            .header(SESSION_HEADER, &self.session_id)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                status.to_string()
            } else {
                format!("{}: {}", status, text)
            };
            return Err(SdkError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Export the current local deck as a `.pptx`.
    pub async fn export(&self) -> Result<ExportedDeck> {
        let payload = build_export_payload(&self.session.snapshot().await)?;
        let url = format!("{}/api/export", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .header(SESSION_HEADER, &self.session_id)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let is_json = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.contains("application/json"));
            let fallback_message = status.to_string();
            let text = response.text().await.unwrap_or_default();

            if is_json {
                let info = serde_json::from_str::<ErrorEnvelope>(&text)
                    .map(|envelope| envelope.error)
                    .unwrap_or_else(|_| ErrorInfo::new(fallback_message, "EXPORT_FAILED"));
                return Err(SdkError::Export {
                    message: info.message,
                    code: info.code,
                });
            }
            return Err(SdkError::Export {
                message: if text.is_empty() { fallback_message } else { text },
                code: "EXPORT_FAILED".to_string(),
            });
        }

        let filename = response
            .headers()
            .get(FILENAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_filename(Utc::now()));
        let bytes = response.bytes().await?.to_vec();

        info!("Downloaded {} ({} bytes)", filename, bytes.len());
        Ok(ExportedDeck { filename, bytes })
    }
}

fn default_filename(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("omega-deck-{}.pptx", stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header, HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    const BUDGET_BRIEF: &str =
        "Launch a budgeting app. Target young professionals. Freemium pricing.";

    async fn spawn_node(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn canned_generate(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        assert_eq!(headers[SESSION_HEADER], "s-1");
        assert_eq!(body["includeExampleTheme"], true);
        Json(json!({
            "provider": "provider",
            "deck": {
                "slides": [{
                    "id": "slide-1", "title": "Hook", "position": 1,
                    "displayTitle": "1. Hook", "bullets": ["A"], "speakerNotes": null
                }],
                "insights": ["Lead with pain"],
                "outline": ["Hook"]
            },
            "themeKey": "example-pptx",
            "customThemeName": null,
            "modelUsed": "gpt-4o",
            "rawModel": { "id": "resp_9" },
            "error": null
        }))
    }

    #[tokio::test]
    async fn test_unreachable_node_drafts_locally() {
        let client = OmegaClient::new("http://127.0.0.1:1");
        let state = client
            .generate(BUDGET_BRIEF, &ThemeSelection::Default)
            .await
            .unwrap();

        assert_eq!(state.provider, Some(ProviderKind::FallbackClient));
        assert_eq!(state.deck.outline[0], "Opening");
        assert_eq!(state.deck.insights.len(), 3);
        assert!((6..=10).contains(&state.deck.len()));
        assert_eq!(state.last_error.unwrap().code, "CLIENT_FETCH_ERROR");
        assert_eq!(client.state().await.brief, BUDGET_BRIEF);
    }

    #[tokio::test]
    async fn test_empty_brief_and_empty_export() {
        let client = OmegaClient::new("http://127.0.0.1:1");
        assert_eq!(
            client.generate("  ", &ThemeSelection::Default).await.unwrap_err(),
            SdkError::BriefRequired
        );
        assert_eq!(client.export().await.unwrap_err(), SdkError::EmptyDeck);
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let url = spawn_node(Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let state = OmegaClient::new(&url)
            .generate("Quarterly review", &ThemeSelection::Default)
            .await
            .unwrap();
        assert_eq!(state.provider, Some(ProviderKind::FallbackClient));
        let error = state.last_error.unwrap();
        assert_eq!(error.code, "SERVER_ERROR");
        assert!(error.message.contains("boom"));
    }

    #[tokio::test]
    async fn test_generate_then_export() {
        let app = Router::new()
            .route("/api/generate", post(canned_generate))
            .route(
                "/api/export",
                post(|Json(body): Json<Value>| async move {
                    assert_eq!(body["slides"][0]["title"], "Hook");
                    assert_eq!(body["speakerNotes"], json!(["Lead with pain"]));
                    (
                        [
                            (header::CONTENT_TYPE, "application/octet-stream"),
                            (header::HeaderName::from_static(FILENAME_HEADER), "hook.pptx"),
                        ],
                        b"PK\x03\x04".to_vec(),
                    )
                        .into_response()
                }),
            );
        let client = OmegaClient::with_session(&spawn_node(app).await, "s-1");

        let state = client
            .generate("Pitch", &ThemeSelection::BuiltInExample)
            .await
            .unwrap();
        assert_eq!(state.provider, Some(ProviderKind::Provider));
        assert_eq!(state.model_used.as_deref(), Some("gpt-4o"));
        assert_eq!(state.raw_provider_response.unwrap()["id"], "resp_9");

        let file = client.export().await.unwrap();
        assert_eq!(file.filename, "hook.pptx");
        assert_eq!(file.bytes, b"PK\x03\x04");
    }

    #[tokio::test]
    async fn test_export_errors() {
        let app = Router::new()
            .route("/api/generate", post(canned_generate))
            .route(
                "/api/export",
                post(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "error": { "message": "Unable to generate PPTX file.", "code": "EXPORT_FAILURE" } })),
                    )
                }),
            );
        let client = OmegaClient::with_session(&spawn_node(app).await, "s-1");
        client.generate("Pitch", &ThemeSelection::BuiltInExample).await.unwrap();
        assert_eq!(
            client.export().await.unwrap_err(),
            SdkError::Export {
                message: "Unable to generate PPTX file.".into(),
                code: "EXPORT_FAILURE".into(),
            }
        );

        let plain = Router::new()
            .route("/api/generate", post(canned_generate))
            .route("/api/export", post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
        let client = OmegaClient::with_session(&spawn_node(plain).await, "s-1");
        client.generate("Pitch", &ThemeSelection::BuiltInExample).await.unwrap();
        let err = client.export().await.unwrap_err();
        assert_eq!(err.code(), "EXPORT_FAILED");
        assert_eq!(err.to_string(), "upstream down");
    }

    #[test]
    fn test_default_filename() {
        use chrono::TimeZone;
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(default_filename(now), "omega-deck-2024-01-02T03-04-05-000Z.pptx");
    }
}
