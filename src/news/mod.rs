// =============================================================================
// News Digest Module
// =============================================================================
//
// Feed fetching, markup stripping, summarization and digest aggregation.

pub mod digest;
pub mod feed;
pub mod normalize;
pub mod summarizer;

pub use digest::{Digest, SourceSummary};
pub use feed::{FeedFetcher, FeedSource, NewsItem};
pub use summarizer::SummarizerClient;
