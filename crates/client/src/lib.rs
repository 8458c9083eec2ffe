//! Client code for howpopular.
//!
//! This crate provides the cached HTTP fetch pipeline, result-count
//! extraction, query resolution and report rendering used by the CLI.

pub mod extract;
pub mod fetch;
pub mod render;
pub mod report;
pub mod resolve;

pub use extract::{HtmlDocument, RESULT_STATS_ID, ScraperDocument, extract_result_stats, parse_leading_count};
pub use fetch::{FetchConfig, Fetcher, ProxyConfig, random_user_agent};
pub use render::{RenderMode, render};
pub use report::{NETWORK_FAILURE_MESSAGE, NO_RESULTS_MESSAGE, Outcome};
pub use resolve::{PageSource, ProviderRegistry, Resolver, SearchProvider, SearchResult};
