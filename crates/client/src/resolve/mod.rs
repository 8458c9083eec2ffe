//! Query to hit-count resolution.
//!
//! Queries are resolved one at a time, in input order:
//!
//! 1. Build the search URL from the selected provider.
//! 2. Fetch the page through a [`PageSource`].
//! 3. Extract the result statistics text and parse its leading count.
//!
//! A missing count is zero hits. A network or TLS failure aborts the batch.

pub mod provider;

use async_trait::async_trait;
use howpopular_core::{AppConfig, Error};

pub use provider::{GOOGLE_TEMPLATE, ProviderRegistry, SearchProvider};

use crate::extract::{extract_result_stats, parse_leading_count};

/// Popularity of a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub query: String,
    pub hits: u64,
}

/// Anything that can turn a URL into page text.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, Error>;
}

/// Resolves query strings to hit counts using one provider.
pub struct Resolver<S> {
    source: S,
    provider: SearchProvider,
    scheme: &'static str,
}

impl<S: PageSource> Resolver<S> {
    pub fn new(source: S, provider: SearchProvider, scheme: &'static str) -> Self {
        Self { source, provider, scheme }
    }

    /// Resolver for the provider and scheme named by `config`.
    pub fn from_config(source: S, config: &AppConfig) -> Self {
        let provider = ProviderRegistry::from_config(config).select(&config.search_engine);
        Self::new(source, provider, config.scheme())
    }

    pub fn provider(&self) -> &SearchProvider {
        &self.provider
    }

    /// Resolve every query, preserving order.
    ///
    /// The first fetch failure is returned and no partial results are kept.
    pub async fn resolve(&self, queries: &[String]) -> Result<Vec<SearchResult>, Error> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            results.push(self.resolve_one(query).await?);
        }
        Ok(results)
    }

    async fn resolve_one(&self, query: &str) -> Result<SearchResult, Error> {
        let url = self.provider.search_url(self.scheme, query);
        let html = self.source.fetch_page(&url).await?;

        let stats = extract_result_stats(&html);
        if stats.is_empty() {
            tracing::debug!("no result statistics for {:?}", query);
        }
        let hits = parse_leading_count(&stats);

        tracing::debug!("{:?} -> {} hits", query, hits);
        Ok(SearchResult { query: query.to_string(), hits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages keyed by query parameter and records requested URLs.
    #[derive(Default)]
    struct MockSource {
        pages: HashMap<String, String>,
        fail_on: Option<String>,
        requested: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn with_page(mut self, query: &str, count: &str) -> Self {
            let html = format!(r#"<html><body><div id="resultStats">About {count} results</div></body></html>"#);
            self.pages.insert(urlencoding::encode(query).into_owned(), html);
            self
        }

        fn failing_on(mut self, query: &str) -> Self {
            self.fail_on = Some(urlencoding::encode(query).into_owned());
            self
        }
    }

    #[async_trait]
    impl PageSource for MockSource {
        async fn fetch_page(&self, url: &str) -> Result<String, Error> {
            self.requested.lock().unwrap().push(url.to_string());
            let query = url.rsplit("q=").next().unwrap_or_default();
            if self.fail_on.as_deref() == Some(query) {
                return Err(Error::Network("connection refused".into()));
            }
            Ok(self.pages.get(query).cloned().unwrap_or_else(|| "<html></html>".into()))
        }
    }

    fn google() -> SearchProvider {
        SearchProvider::new("google", GOOGLE_TEMPLATE)
    }

    fn queries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolve_preserves_order_and_length() {
        let source = MockSource::default().with_page("alpha", "100").with_page("beta", "1,050");
        let resolver = Resolver::new(source, google(), "https://");

        let results = resolver.resolve(&queries(&["beta", "missing", "alpha"])).await.unwrap();

        assert_eq!(
            results,
            vec![
                SearchResult { query: "beta".into(), hits: 1050 },
                SearchResult { query: "missing".into(), hits: 0 },
                SearchResult { query: "alpha".into(), hits: 100 },
            ]
        );
    }

    #[tokio::test]
    async fn test_resolve_builds_escaped_urls() {
        let resolver = Resolver::new(MockSource::default(), google(), "http://");
        resolver.resolve(&queries(&["hello world"])).await.unwrap();

        let requested = resolver.source.requested.lock().unwrap();
        assert_eq!(*requested, vec!["http://www.google.com/search?q=hello%20world".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_empty_batch() {
        let resolver = Resolver::new(MockSource::default(), google(), "https://");
        assert!(resolver.resolve(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_aborts_on_network_failure() {
        let source = MockSource::default().with_page("alpha", "100").failing_on("beta");
        let resolver = Resolver::new(source, google(), "https://");

        let result = resolver.resolve(&queries(&["alpha", "beta", "gamma"])).await;
        assert!(matches!(result, Err(Error::Network(_))));

        let requested = resolver.source.requested.lock().unwrap();
        assert_eq!(requested.len(), 2, "no fetch after the failure");
    }

    #[test]
    fn test_from_config_selects_engine_and_scheme() {
        let mut config = AppConfig { disable_ssl: true, search_engine: "bing".into(), ..Default::default() };
        config.providers.insert("bing".into(), "www.bing.com/search?q={query}".into());

        let resolver = Resolver::from_config(MockSource::default(), &config);
        assert_eq!(resolver.provider().name, "bing");
        assert_eq!(resolver.scheme, "http://");
    }
}
