use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use crate::app_config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::market_data::MarketDataClient;
use crate::news::{FeedFetcher, SummarizerClient};
use crate::notifier::TelegramNotifier;
use crate::pipeline::{self, RunContext};

#[derive(Parser)]
#[command(name = "market-brief")]
#[command(about = "News digest, equity dip report and crypto summary", long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch RSS feeds and print per-source and combined summaries
    News,
    /// Evaluate the bottom signal and send the dip report
    Dip {
        /// Print the report without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Compute lookback metrics and send the crypto summary
    Crypto {
        /// Print the report without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the bot's pending updates (useful for finding the chat id)
    Ping,
    /// Write the default configuration to the config path
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::News => "news",
            Commands::Dip { .. } => "dip",
            Commands::Crypto { .. } => "crypto",
            Commands::Ping => "ping",
            Commands::InitConfig { .. } => "init-config",
        }
    }
}

/// Dispatch one command. Pipeline failures are logged, not returned; only
/// setup errors (bad client config, refused overwrite) surface as `Err`.
pub async fn run(cli: Cli, config: AppConfig, ctx: RunContext) -> Result<()> {
    match cli.command {
        Commands::News => {
            let api_key = config.summarizer_api_key().unwrap_or_else(|| {
                warn!(
                    var = %config.summarizer.api_key_env,
                    "summarizer API key not set, summaries will fall back to the source text"
                );
                String::new()
            });
            let fetcher = FeedFetcher::new(config.retry.clone(), config.items_per_feed)?;
            let summarizer = SummarizerClient::new(&config.summarizer.api_url, api_key)?;
            let digest = pipeline::news::run_digest(&fetcher, &summarizer, &config.feeds).await;
            info!(sources = digest.sources.len(), "news digest complete");
        }
        Commands::Dip { dry_run } => {
            let client = MarketDataClient::new(&config.market.base_url, config.retry.clone())?;
            let text = pipeline::market::build_dip_report(&client, &config.market, ctx.run_date).await;
            if let Err(e) = pipeline::deliver(&config.notifier, &text, dry_run).await {
                error!(error = %e, "failed to deliver dip report");
            }
        }
        Commands::Crypto { dry_run } => {
            let client = MarketDataClient::new(&config.market.base_url, config.retry.clone())?;
            let text = pipeline::crypto::build_crypto_report(&client, &config.crypto, ctx.run_date).await;
            if let Err(e) = pipeline::deliver(&config.notifier, &text, dry_run).await {
                error!(error = %e, "failed to deliver crypto summary");
            }
        }
        Commands::Ping => {
            let credentials = config.notifier.credentials.resolve()?;
            let notifier = TelegramNotifier::new(&config.notifier.base_url, credentials)?;
            let updates = notifier.get_updates().await?;
            println!("{}", serde_json::to_string_pretty(&updates)?);
        }
        Commands::InitConfig { force } => {
            if cli.config.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", cli.config.display());
            }
            // Defaults, not the loaded config with env overrides applied.
            AppConfig::default()
                .save(&cli.config)
                .with_context(|| format!("failed to write {}", cli.config.display()))?;
            info!(path = %cli.config.display(), "configuration written");
        }
    }
    Ok(())
}
