// =============================================================================
// Summarizer Client — hosted text-summarization inference endpoint
// =============================================================================
//
// Request:  POST {api_url}  Authorization: Bearer <key>  {"inputs": "<text>"}
// Response: [{"summary_text": "<summary>"}]
//
// A non-success status degrades gracefully: the caller gets its input back
// unchanged. No retries; the model endpoint is slow and rate limited and a
// pass-through is an acceptable result.
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummaryEntry {
    summary_text: String,
}

#[derive(Clone)]
pub struct SummarizerClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SummarizerClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build summarizer HTTP client")?;

        Ok(Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Summarize `text`, returning it unchanged on any failure.
    pub async fn summarize(&self, text: &str) -> String {
        match self.try_summarize(text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "summarization failed, passing text through");
                text.to_string()
            }
        }
    }

    /// Summarize `text`.
    ///
    /// `Ok(text)` (unchanged) on a non-success status; `Err` only for
    /// transport failures or an unreadable success body.
    #[instrument(skip(self, text), fields(chars = text.len()), name = "summarizer::summarize")]
    pub async fn try_summarize(&self, text: &str) -> Result<String> {
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SummarizeRequest { inputs: text })
            .send()
            .await
            .context("POST summarization request failed")?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "summarizer returned non-success status");
            return Ok(text.to_string());
        }

        let entries: Vec<SummaryEntry> = resp
            .json()
            .await
            .context("failed to parse summarization response")?;

        let summary = entries
            .into_iter()
            .next()
            .map(|e| e.summary_text)
            .context("summarization response was an empty array")?;

        debug!(summary_chars = summary.len(), "text summarized");
        Ok(summary)
    }
}

impl std::fmt::Debug for SummarizerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn summarize_stub(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer test-key");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad token"}))).into_response();
        }
        let input = body["inputs"].as_str().unwrap_or_default();
        Json(json!([{ "summary_text": format!("summary of {} chars", input.len()) }])).into_response()
    }

    #[tokio::test]
    async fn returns_summary_text_on_success() {
        let app = Router::new().route("/", post(summarize_stub));
        let addr = test_support::serve(app).await;
        let client = SummarizerClient::new(format!("http://{addr}/"), "test-key").unwrap();

        assert_eq!(client.summarize("hello").await, "summary of 5 chars");
    }

    #[tokio::test]
    async fn service_unavailable_returns_input_unchanged() {
        let app = Router::new().route("/", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let addr = test_support::serve(app).await;
        let client = SummarizerClient::new(format!("http://{addr}/"), "test-key").unwrap();

        let input = "Rates hold steady;Mon, 14 Oct 2024;The bank kept rates.";
        assert_eq!(client.try_summarize(input).await.unwrap(), input);
        assert_eq!(client.summarize(input).await, input);
    }

    #[tokio::test]
    async fn wrong_key_passes_text_through() {
        let app = Router::new().route("/", post(summarize_stub));
        let addr = test_support::serve(app).await;
        let client = SummarizerClient::new(format!("http://{addr}/"), "wrong").unwrap();

        assert_eq!(client.summarize("keep me").await, "keep me");
    }

    #[tokio::test]
    async fn transport_failure_is_an_error_but_summarize_degrades() {
        let addr = test_support::dead_addr().await;
        let client = SummarizerClient::new(format!("http://{addr}/"), "test-key").unwrap();

        assert!(client.try_summarize("text").await.is_err());
        assert_eq!(client.summarize("text").await, "text");
    }

    #[tokio::test]
    async fn malformed_success_body_degrades() {
        let app = Router::new().route("/", post(|| async { Json(json!({"unexpected": true})) }));
        let addr = test_support::serve(app).await;
        let client = SummarizerClient::new(format!("http://{addr}/"), "test-key").unwrap();

        assert_eq!(client.summarize("original").await, "original");
    }
}
