// =============================================================================
// Pipelines — one batch run per invocation
// =============================================================================
//
// Each pipeline fetches, computes and formats; delivery is shared. Failures
// inside a pipeline degrade the output (empty source, pass-through summary,
// sentinel message) instead of aborting the run.

pub mod crypto;
pub mod market;
pub mod news;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use tracing::info;

use crate::app_config::NotifierSettings;
use crate::notifier::TelegramNotifier;

/// Values fixed once at the start of a run.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub run_date: NaiveDate,
}

impl RunContext {
    pub fn capture() -> Self {
        Self {
            run_date: Local::now().date_naive(),
        }
    }
}

/// Print `text` and, unless `dry_run`, push it to the chat bot.
pub async fn deliver(settings: &NotifierSettings, text: &str, dry_run: bool) -> Result<()> {
    println!("{text}");

    if dry_run {
        info!("dry run, skipping notifier");
        return Ok(());
    }

    let credentials = settings
        .credentials
        .resolve()
        .context("cannot resolve notifier credentials")?;
    let notifier = TelegramNotifier::new(&settings.base_url, credentials)?;
    notifier.send_message(text).await?;

    info!(chars = text.len(), "report delivered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::CredentialSource;
    use crate::test_support;
    use axum::{routing::post, Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn deliver_dry_run_needs_no_credentials() {
        let settings = NotifierSettings {
            base_url: "http://127.0.0.1:9".into(),
            credentials: CredentialSource::Env {
                token_var: "MARKET_BRIEF_TEST_UNSET_TOKEN".into(),
                chat_id_var: "MARKET_BRIEF_TEST_UNSET_CHAT".into(),
            },
        };
        deliver(&settings, "report", true).await.unwrap();
        assert!(deliver(&settings, "report", false).await.is_err());
    }

    #[tokio::test]
    async fn deliver_sends_with_inline_credentials() {
        let app = Router::new().route("/:bot/sendMessage", post(|| async { Json(json!({"ok": true})) }));
        let addr = test_support::serve(app).await;
        let settings = NotifierSettings {
            base_url: format!("http://{addr}"),
            credentials: CredentialSource::Inline {
                bot_token: "1:x".into(),
                chat_id: "5".into(),
            },
        };
        deliver(&settings, "report", false).await.unwrap();
    }
}
