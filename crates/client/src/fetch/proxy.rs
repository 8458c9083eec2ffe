//! Proxy configuration from `<scheme>_proxy` environment variables.
//!
//! Only HTTP-family schemes are kept. Lowercase variables take precedence
//! over their uppercase spelling, and a proxy given without a scheme is
//! treated as `http://`.

use std::collections::BTreeMap;

use howpopular_core::Error;
use reqwest::{ClientBuilder, Proxy};

const PROXY_SUFFIX: &str = "_proxy";

/// Scheme to proxy endpoint mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    entries: BTreeMap<String, String>,
}

impl ProxyConfig {
    /// Read proxy settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from `(name, value)` pairs shaped like environment variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut entries = BTreeMap::new();
        let mut from_lowercase = Vec::new();

        for (name, value) in vars {
            let (name, value) = (name.as_ref(), value.as_ref().trim());
            let lower = name.to_ascii_lowercase();
            let Some(scheme) = lower.strip_suffix(PROXY_SUFFIX) else {
                continue;
            };
            if value.is_empty() || !scheme.starts_with("http") {
                continue;
            }

            let is_lowercase = name == lower;
            if !is_lowercase && from_lowercase.iter().any(|s: &String| s == scheme) {
                continue;
            }
            if is_lowercase {
                from_lowercase.push(scheme.to_string());
            }
            entries.insert(scheme.to_string(), normalize_proxy_url(value));
        }

        Self { entries }
    }

    /// Proxy endpoint for `scheme`, if configured.
    pub fn get(&self, scheme: &str) -> Option<&str> {
        self.entries.get(scheme).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register the configured proxies on a client builder.
    ///
    /// Automatic system proxy detection is turned off so that only these
    /// entries apply.
    pub(crate) fn apply(&self, mut builder: ClientBuilder) -> Result<ClientBuilder, Error> {
        builder = builder.no_proxy();

        for (scheme, endpoint) in &self.entries {
            let proxy = match scheme.as_str() {
                "http" => Proxy::http(endpoint),
                "https" => Proxy::https(endpoint),
                other => {
                    tracing::debug!("ignoring proxy for unsupported scheme {}", other);
                    continue;
                }
            }
            .map_err(|e| Error::InvalidUrl(format!("invalid {scheme} proxy {endpoint}: {e}")))?;

            tracing::debug!("using {} proxy {}", scheme, endpoint);
            builder = builder.proxy(proxy);
        }

        Ok(builder)
    }
}

fn normalize_proxy_url(value: &str) -> String {
    if value.contains("://") { value.to_string() } else { format!("http://{value}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_http_family_only() {
        let config = ProxyConfig::from_vars([
            ("http_proxy", "http://proxy:8080"),
            ("https_proxy", "http://secure-proxy:8443"),
            ("ftp_proxy", "http://ftp-proxy:21"),
            ("no_proxy", "localhost"),
            ("PATH", "/usr/bin"),
        ]);

        assert_eq!(config.get("http"), Some("http://proxy:8080"));
        assert_eq!(config.get("https"), Some("http://secure-proxy:8443"));
        assert_eq!(config.get("ftp"), None);
        assert_eq!(config.get("no"), None);
    }

    #[test]
    fn test_adds_missing_scheme() {
        let config = ProxyConfig::from_vars([("http_proxy", "proxy.local:3128")]);
        assert_eq!(config.get("http"), Some("http://proxy.local:3128"));
    }

    #[test]
    fn test_keeps_explicit_scheme() {
        let config = ProxyConfig::from_vars([("https_proxy", "https://proxy.local:3128")]);
        assert_eq!(config.get("https"), Some("https://proxy.local:3128"));
    }

    #[test]
    fn test_lowercase_wins_regardless_of_order() {
        let upper_first = ProxyConfig::from_vars([("HTTP_PROXY", "upper:1"), ("http_proxy", "lower:2")]);
        let lower_first = ProxyConfig::from_vars([("http_proxy", "lower:2"), ("HTTP_PROXY", "upper:1")]);

        assert_eq!(upper_first.get("http"), Some("http://lower:2"));
        assert_eq!(lower_first.get("http"), Some("http://lower:2"));
    }

    #[test]
    fn test_uppercase_used_when_alone() {
        let config = ProxyConfig::from_vars([("HTTPS_PROXY", "proxy:443")]);
        assert_eq!(config.get("https"), Some("http://proxy:443"));
    }

    #[test]
    fn test_empty_values_ignored() {
        let config = ProxyConfig::from_vars([("http_proxy", "  ")]);
        assert!(config.is_empty());
    }

    #[test]
    fn test_apply_rejects_invalid_proxy() {
        let config = ProxyConfig::from_vars([("http_proxy", "http://[not-a-host")]);
        let result = config.apply(reqwest::Client::builder());
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_apply_accepts_valid_proxies() {
        let config = ProxyConfig::from_vars([("http_proxy", "proxy:8080"), ("https_proxy", "proxy:8443")]);
        let builder = config.apply(reqwest::Client::builder()).unwrap();
        assert!(builder.build().is_ok());
    }
}
