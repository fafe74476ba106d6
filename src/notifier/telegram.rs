// =============================================================================
// Telegram Bot API notifier
// =============================================================================
//
// SECURITY: the bot token is part of the URL path, so URLs are never logged
// and `Debug` redacts both token and chat id.
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Resolved bot credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct TelegramNotifier {
    credentials: TelegramCredentials,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(base_url: impl Into<String>, credentials: TelegramCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build notifier HTTP client")?;

        Ok(Self {
            credentials,
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.credentials.bot_token, method)
    }

    /// POST sendMessage with form fields `chat_id` and `text`.
    #[instrument(skip(self, text), fields(chars = text.len()), name = "telegram::send_message")]
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .form(&[("chat_id", self.credentials.chat_id.as_str()), ("text", text)])
            .send()
            .await
            // reqwest errors embed the URL, which carries the token.
            .map_err(|e| anyhow::anyhow!("sendMessage request failed: {}", e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("sendMessage returned {}: {}", status, body);
        }

        debug!("message delivered");
        Ok(())
    }

    /// GET getUpdates: recent updates for the bot, used to discover chat ids.
    #[instrument(skip(self), name = "telegram::get_updates")]
    pub async fn get_updates(&self) -> Result<serde_json::Value> {
        let resp = self
            .client
            .get(self.method_url("getUpdates"))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("getUpdates request failed: {}", e.without_url()))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("failed to parse getUpdates response: {}", e.without_url()))?;

        if !status.is_success() {
            anyhow::bail!("getUpdates returned {}: {}", status, body);
        }

        Ok(body)
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::{
        extract::{Form, Path},
        http::StatusCode,
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn credentials() -> TelegramCredentials {
        TelegramCredentials {
            bot_token: "123:abc".into(),
            chat_id: "42".into(),
        }
    }

    #[tokio::test]
    async fn send_message_posts_form_fields() {
        let received: Arc<Mutex<Vec<HashMap<String, String>>>> = Arc::default();
        let sink = received.clone();
        let app = Router::new().route(
            "/:bot/sendMessage",
            post(move |Path(bot): Path<String>, Form(form): Form<HashMap<String, String>>| {
                let sink = sink.clone();
                async move {
                    if bot != "bot123:abc" {
                        return StatusCode::NOT_FOUND.into_response();
                    }
                    sink.lock().unwrap().push(form);
                    Json(json!({"ok": true})).into_response()
                }
            }),
        );
        let addr = test_support::serve(app).await;
        let notifier = TelegramNotifier::new(format!("http://{addr}"), credentials()).unwrap();

        notifier.send_message("📊 hello").await.unwrap();

        let forms = received.lock().unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0]["chat_id"], "42");
        assert_eq!(forms[0]["text"], "📊 hello");
    }

    #[tokio::test]
    async fn send_message_error_status_is_err() {
        let app = Router::new().route(
            "/:bot/sendMessage",
            post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"ok": false}))) }),
        );
        let addr = test_support::serve(app).await;
        let notifier = TelegramNotifier::new(format!("http://{addr}"), credentials()).unwrap();

        let err = notifier.send_message("x").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_token() {
        let addr = test_support::dead_addr().await;
        let notifier = TelegramNotifier::new(format!("http://{addr}"), credentials()).unwrap();

        let err = notifier.send_message("x").await.unwrap_err();
        assert!(!format!("{err:#}").contains("123:abc"));
    }

    #[tokio::test]
    async fn get_updates_returns_body() {
        let app = Router::new().route(
            "/:bot/getUpdates",
            get(|| async { Json(json!({"ok": true, "result": []})) }),
        );
        let addr = test_support::serve(app).await;
        let notifier = TelegramNotifier::new(format!("http://{addr}"), credentials()).unwrap();

        let body = notifier.get_updates().await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("123:abc"));
        assert!(!rendered.contains("42"));
    }
}
