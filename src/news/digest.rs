// =============================================================================
// Digest aggregation & console formatting
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::news::feed::NewsItem;

/// Stand-in summary for a source that produced no items.
pub const NO_NEWS: &str = "No news available.";

const SEPARATOR_WIDTH: usize = 80;

/// Summary text for one feed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub item_count: usize,
    pub summary: String,
}

/// Result of a digest run: per-source summaries in feed order plus the
/// overall summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digest {
    pub sources: Vec<SourceSummary>,
    pub total: String,
}

/// Join the normalized lines of `items` with `|`, the summarizer input for
/// one source.
pub fn source_payload(items: &[NewsItem]) -> String {
    items
        .iter()
        .map(NewsItem::digest_line)
        .collect::<Vec<_>>()
        .join("|")
}

/// `source: summary` lines, in order.
pub fn summary_lines(sources: &[SourceSummary]) -> Vec<String> {
    sources
        .iter()
        .map(|s| format!("{}: {}", s.source, s.summary))
        .collect()
}

/// Prompt for the cross-source summary.
pub fn combined_prompt(sources: &[SourceSummary]) -> String {
    format!(
        "Here are summaries of headlines from various news sources: {}\n\
         Summarize the key themes and topics that are important for the economy \
         in a few sentences drawing connections between the sources.",
        summary_lines(sources).join("\n")
    )
}

pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Console block for a raw (un-normalized) item.
pub fn format_item(item: &NewsItem) -> String {
    format!(
        "Source: {}\nTitle: {}\nLink: {}\nPublished: {}\nSummary: {}\n{}\n",
        item.source,
        item.title,
        item.link,
        item.published_label(),
        item.summary,
        separator()
    )
}
