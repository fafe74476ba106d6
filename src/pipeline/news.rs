// News digest: fetch → normalize → summarize per source → summarize all.

use futures_util::future::join_all;
use tracing::{info, instrument};

use crate::news::digest::{self, NO_NEWS};
use crate::news::{Digest, FeedFetcher, FeedSource, NewsItem, SourceSummary, SummarizerClient};

/// Run the digest over `feeds`, printing progress and results to stdout.
///
/// Feeds are fetched concurrently; everything after that follows feed order.
#[instrument(skip_all, fields(feeds = feeds.len()), name = "pipeline::news")]
pub async fn run_digest(fetcher: &FeedFetcher, summarizer: &SummarizerClient, feeds: &[FeedSource]) -> Digest {
    println!("Reading news...");

    let batches: Vec<Vec<NewsItem>> = join_all(
        feeds
            .iter()
            .map(|feed| async move { fetcher.fetch(feed).await.collect::<Vec<_>>() }),
    )
    .await;

    let mut sources = Vec::with_capacity(feeds.len());
    for (feed, items) in feeds.iter().zip(batches) {
        println!("{} fetched ({} items)", feed.name, items.len());
        for item in &items {
            println!("{}", digest::format_item(item));
        }

        let summary = if items.is_empty() {
            NO_NEWS.to_string()
        } else {
            summarizer.summarize(&digest::source_payload(&items)).await
        };
        println!("Summary for {}: {}", feed.name, summary);
        println!("{}", digest::separator());

        info!(source = %feed.name, items = items.len(), "source summarized");
        sources.push(SourceSummary {
            source: feed.name.clone(),
            item_count: items.len(),
            summary,
        });
    }

    println!("Summaries for all sources:");
    for line in digest::summary_lines(&sources) {
        println!("{line}");
        println!("{}", digest::separator());
    }
    println!();

    let total = summarizer.summarize(&digest::combined_prompt(&sources)).await;
    println!("Total Summary: {total}");

    Digest { sources, total }
}
