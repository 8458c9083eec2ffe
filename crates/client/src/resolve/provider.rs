//! Search provider registry.
//!
//! A provider is a name plus a URL template with one `{query}` slot and no
//! scheme. The scheme is chosen at request time from the TLS setting.

use std::collections::BTreeMap;

use howpopular_core::AppConfig;
use howpopular_core::config::{DEFAULT_SEARCH_ENGINE, QUERY_SLOT};

/// Built-in Google template.
pub const GOOGLE_TEMPLATE: &str = "www.google.com/search?q={query}";

/// A named search URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProvider {
    pub name: String,
    pub template: String,
}

impl SearchProvider {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self { name: name.into(), template: strip_scheme(&template.into()).to_string() }
    }

    /// Build the search URL for `query` with the given scheme prefix (`"https://"`).
    pub fn search_url(&self, scheme: &str, query: &str) -> String {
        let escaped = urlencoding::encode(query);
        format!("{}{}", scheme, self.template.replacen(QUERY_SLOT, &escaped, 1))
    }
}

/// Name to provider mapping with a guaranteed default.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, SearchProvider>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert(DEFAULT_SEARCH_ENGINE.to_string(), SearchProvider::new(DEFAULT_SEARCH_ENGINE, GOOGLE_TEMPLATE));
        Self { providers }
    }
}

impl ProviderRegistry {
    /// Built-in providers plus any declared in `config`.
    ///
    /// Config entries replace built-ins with the same name.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut registry = Self::default();
        for (name, template) in &config.providers {
            registry.register(SearchProvider::new(name.as_str(), template.as_str()));
        }
        registry
    }

    pub fn register(&mut self, provider: SearchProvider) {
        tracing::debug!("registered search provider {} ({})", provider.name, provider.template);
        self.providers.insert(provider.name.clone(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&SearchProvider> {
        self.providers.get(name)
    }

    /// Look up `name`, falling back to the default provider when it is unknown.
    pub fn select(&self, name: &str) -> SearchProvider {
        if let Some(provider) = self.get(name) {
            return provider.clone();
        }

        tracing::warn!("unknown search engine {:?}, falling back to {}", name, DEFAULT_SEARCH_ENGINE);
        self.get(DEFAULT_SEARCH_ENGINE)
            .cloned()
            .unwrap_or_else(|| SearchProvider::new(DEFAULT_SEARCH_ENGINE, GOOGLE_TEMPLATE))
    }
}

fn strip_scheme(template: &str) -> &str {
    match template.split_once("://") {
        Some((_, rest)) => rest,
        None => template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_google() {
        let registry = ProviderRegistry::default();
        let google = registry.get("google").unwrap();
        assert_eq!(google.template, GOOGLE_TEMPLATE);
    }

    #[test]
    fn test_search_url_escapes_query() {
        let google = ProviderRegistry::default().select("google");
        assert_eq!(
            google.search_url("https://", "rust lang & c++"),
            "https://www.google.com/search?q=rust%20lang%20%26%20c%2B%2B"
        );
    }

    #[test]
    fn test_search_url_plain_http() {
        let google = ProviderRegistry::default().select("google");
        assert_eq!(google.search_url("http://", "tokio"), "http://www.google.com/search?q=tokio");
    }

    #[test]
    fn test_unknown_provider_falls_back_to_default() {
        let registry = ProviderRegistry::default();
        assert_eq!(registry.select("altavista").name, "google");
    }

    #[test]
    fn test_from_config_adds_providers() {
        let mut config = AppConfig::default();
        config
            .providers
            .insert("bing".into(), "https://www.bing.com/search?q={query}".into());

        let registry = ProviderRegistry::from_config(&config);
        let bing = registry.select("bing");
        assert_eq!(bing.template, "www.bing.com/search?q={query}");
        assert_eq!(bing.search_url("https://", "serde"), "https://www.bing.com/search?q=serde");
        assert!(registry.get("google").is_some());
    }

    #[test]
    fn test_config_can_replace_builtin() {
        let mut config = AppConfig::default();
        config
            .providers
            .insert("google".into(), "www.google.co.uk/search?q={query}".into());

        let registry = ProviderRegistry::from_config(&config);
        assert_eq!(registry.select("google").template, "www.google.co.uk/search?q={query}");
    }
}
