// =============================================================================
// Application Configuration — JSON file + environment, with atomic save
// =============================================================================
//
// Every tunable lives here and is passed explicitly into each pipeline.
// All fields carry serde defaults so partial files (or `{}`) load fine.
//
// Secrets never have literal defaults. Bot credentials come from environment
// variables unless the file explicitly opts into `"source": "inline"`.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::news::FeedSource;
use crate::notifier::TelegramCredentials;
use crate::retry::RetryPolicy;
use crate::signals::BottomSignalParams;

/// Default config path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "market_brief.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_feeds() -> Vec<FeedSource> {
    vec![
        FeedSource::new("bbc_news", "https://feeds.bbci.co.uk/news/rss.xml"),
        FeedSource::new(
            "reuters_news",
            "https://news.google.com/rss/search?q=site%3Areuters.com&hl=en-US&gl=US&ceid=US%3Aen",
        ),
        FeedSource::new("pew_news", "https://www.pewresearch.org/feed/"),
        FeedSource::new(
            "bloomberg_news",
            "https://news.google.com/rss/search?q=when:24h+allinurl:bloomberg.com&hl=en-US&gl=US&ceid=US:en",
        ),
        FeedSource::new("aljazeera_news", "https://www.aljazeera.com/xml/rss/all.xml"),
    ]
}

fn default_items_per_feed() -> usize {
    3
}

fn default_summarizer_url() -> String {
    "https://api-inference.huggingface.co/models/microsoft/prophetnet-large-uncased".to_string()
}

fn default_summarizer_key_var() -> String {
    "HF_API_KEY".to_string()
}

fn default_market_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_symbol() -> String {
    "SPY".to_string()
}

fn default_display_name() -> String {
    "S&P 500".to_string()
}

fn default_volatility_symbol() -> String {
    "^VIX".to_string()
}

fn default_market_range() -> String {
    "6mo".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_rsi_window() -> usize {
    14
}

fn default_low_window() -> usize {
    5
}

fn default_crypto_symbols() -> Vec<String> {
    vec!["BTC-USD".to_string(), "ETH-USD".to_string()]
}

fn default_crypto_range() -> String {
    // Must exceed the longest lookback (3 years).
    "5y".to_string()
}

fn default_notifier_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_token_var() -> String {
    "TELEGRAM_BOT_TOKEN".to_string()
}

fn default_chat_id_var() -> String {
    "TELEGRAM_CHAT_ID".to_string()
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerSettings {
    #[serde(default = "default_summarizer_url")]
    pub api_url: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_summarizer_key_var")]
    pub api_key_env: String,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            api_url: default_summarizer_url(),
            api_key_env: default_summarizer_key_var(),
        }
    }
}

/// Equity dip-report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSettings {
    /// Chart endpoint base URL, shared with the crypto summary.
    #[serde(default = "default_market_base_url")]
    pub base_url: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Name shown in the report header.
    #[serde(default = "default_display_name")]
    pub display_name: String,

    #[serde(default = "default_volatility_symbol")]
    pub volatility_symbol: String,

    #[serde(default = "default_market_range")]
    pub range: String,

    #[serde(default = "default_interval")]
    pub interval: String,

    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    /// Window of the rolling low, inclusive of the current bar.
    #[serde(default = "default_low_window")]
    pub low_window: usize,

    #[serde(default)]
    pub signal: BottomSignalParams,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            base_url: default_market_base_url(),
            symbol: default_symbol(),
            display_name: default_display_name(),
            volatility_symbol: default_volatility_symbol(),
            range: default_market_range(),
            interval: default_interval(),
            rsi_window: default_rsi_window(),
            low_window: default_low_window(),
            signal: BottomSignalParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoSettings {
    #[serde(default = "default_crypto_symbols")]
    pub symbols: Vec<String>,

    #[serde(default = "default_crypto_range")]
    pub range: String,

    #[serde(default = "default_interval")]
    pub interval: String,
}

impl Default for CryptoSettings {
    fn default() -> Self {
        Self {
            symbols: default_crypto_symbols(),
            range: default_crypto_range(),
            interval: default_interval(),
        }
    }
}

/// Where the bot token and chat id come from.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CredentialSource {
    /// Read from the named environment variables.
    Env {
        #[serde(default = "default_token_var")]
        token_var: String,
        #[serde(default = "default_chat_id_var")]
        chat_id_var: String,
    },
    /// Stored in the config file itself.
    Inline { bot_token: String, chat_id: String },
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Env {
            token_var: default_token_var(),
            chat_id_var: default_chat_id_var(),
        }
    }
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env {
                token_var,
                chat_id_var,
            } => f
                .debug_struct("Env")
                .field("token_var", token_var)
                .field("chat_id_var", chat_id_var)
                .finish(),
            Self::Inline { .. } => f
                .debug_struct("Inline")
                .field("bot_token", &"<redacted>")
                .field("chat_id", &"<redacted>")
                .finish(),
        }
    }
}

impl CredentialSource {
    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<TelegramCredentials> {
        self.resolve_with(|var| std::env::var(var).ok())
    }

    /// Resolve using `lookup` for environment variables.
    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<TelegramCredentials> {
        let (bot_token, chat_id) = match self {
            Self::Env {
                token_var,
                chat_id_var,
            } => {
                let token = lookup(token_var)
                    .filter(|v| !v.trim().is_empty())
                    .with_context(|| format!("environment variable {token_var} is not set"))?;
                let chat = lookup(chat_id_var)
                    .filter(|v| !v.trim().is_empty())
                    .with_context(|| format!("environment variable {chat_id_var} is not set"))?;
                (token, chat)
            }
            Self::Inline { bot_token, chat_id } => (bot_token.clone(), chat_id.clone()),
        };

        if bot_token.trim().is_empty() || chat_id.trim().is_empty() {
            anyhow::bail!("bot token and chat id must both be non-empty");
        }

        Ok(TelegramCredentials {
            bot_token: bot_token.trim().to_string(),
            chat_id: chat_id.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierSettings {
    #[serde(default = "default_notifier_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub credentials: CredentialSource,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            base_url: default_notifier_base_url(),
            credentials: CredentialSource::default(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Feed sources, in digest order.
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedSource>,

    #[serde(default = "default_items_per_feed")]
    pub items_per_feed: usize,

    #[serde(default)]
    pub summarizer: SummarizerSettings,

    #[serde(default)]
    pub market: MarketSettings,

    #[serde(default)]
    pub crypto: CryptoSettings,

    #[serde(default)]
    pub notifier: NotifierSettings,

    /// Retry policy for feed and market-data fetches.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            items_per_feed: default_items_per_feed(),
            summarizer: SummarizerSettings::default(),
            market: MarketSettings::default(),
            crypto: CryptoSettings::default(),
            notifier: NotifierSettings::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            feeds = config.feeds.len(),
            symbol = %config.market.symbol,
            crypto = ?config.crypto.symbols,
            "config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "config saved (atomic)");
        Ok(())
    }

    /// Apply `MARKET_BRIEF_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|var| std::env::var(var).ok());
    }

    pub fn apply_overrides_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(symbol) = lookup("MARKET_BRIEF_SYMBOL") {
            let symbol = symbol.trim().to_uppercase();
            if !symbol.is_empty() {
                self.market.symbol = symbol;
            }
        }

        if let Some(syms) = lookup("MARKET_BRIEF_CRYPTO_SYMBOLS") {
            let symbols: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !symbols.is_empty() {
                self.crypto.symbols = symbols;
            }
        }
    }

    /// Bearer token for the summarizer, if its variable is set.
    pub fn summarizer_api_key(&self) -> Option<String> {
        std::env::var(&self.summarizer.api_key_env)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}
