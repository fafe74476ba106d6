// =============================================================================
// Market Brief — Main Entry Point
// =============================================================================
//
// One command per invocation (news | dip | crypto | ping | init-config), meant
// to be run from cron. Reports go to stdout and, unless --dry-run, to the chat
// bot. A failing source degrades the report; it never aborts the run.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod app_config;
mod cli;
mod indicators;
mod market_data;
mod news;
mod notifier;
mod pipeline;
mod report;
mod retry;
mod signals;
mod types;

#[cfg(test)]
mod test_support;

use clap::Parser;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;

use crate::app_config::AppConfig;
use crate::cli::Cli;
use crate::pipeline::RunContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    // Logs go to stderr so stdout carries only report text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── 2. Config ────────────────────────────────────────────────────────
    let mut config = AppConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    config.apply_env_overrides();

    // ── 3. Run ───────────────────────────────────────────────────────────
    let ctx = RunContext::capture();
    let run_id = uuid::Uuid::new_v4();
    let span = info_span!("run", %run_id, command = cli.command.name());

    async move {
        info!(date = %ctx.run_date, "market-brief starting");
        let result = cli::run(cli, config, ctx).await;
        info!(ok = result.is_ok(), "market-brief finished");
        result
    }
    .instrument(span)
    .await
}
