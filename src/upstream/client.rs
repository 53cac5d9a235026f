//! Outbound calls to the recordings search API.
//!
//! # Responsibilities
//! - Encode the term and build `<base>?query=<term>`
//! - Issue a single GET (no retries, no redirects)
//! - Return the body on 2xx, the status otherwise

use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use url::form_urlencoded;

use crate::config::UpstreamConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::observability::metrics;

/// Form-urlencode a term the way HTML forms do (space becomes `+`).
pub fn encode_term(term: &str) -> String {
    form_urlencoded::byte_serialize(term.as_bytes()).collect()
}

/// Client for the upstream search endpoint.
#[derive(Clone)]
pub struct UpstreamFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamFetcher {
    /// Build a fetcher from configuration.
    pub fn new(config: &UpstreamConfig) -> ProxyResult<Self> {
        let mut builder = reqwest::Client::builder().redirect(Policy::none());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    /// Full request URL for an already encoded term.
    pub fn query_url(&self, encoded_term: &str) -> String {
        format!("{}?query={}", self.base_url, encoded_term)
    }

    /// Fetch the search results for an already encoded term.
    ///
    /// Statuses of 300 and above come back as [`ProxyError::UpstreamRejected`]
    /// without reading the body.
    pub async fn fetch(&self, encoded_term: &str) -> ProxyResult<String> {
        let url = self.query_url(encoded_term);
        let start_time = Instant::now();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Upstream request failed");
                metrics::record_upstream(None, start_time);
                return Err(e.into());
            }
        };

        let status = response.status();
        metrics::record_upstream(Some(status.as_u16()), start_time);

        if status.as_u16() >= 300 {
            tracing::warn!(url = %url, status = %status, "Upstream rejected lookup");
            return Err(ProxyError::UpstreamRejected(status));
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to read upstream body");
            ProxyError::from(e)
        })?;

        tracing::debug!(
            url = %url,
            status = %status,
            bytes = body.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Upstream lookup succeeded"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_term() {
        assert_eq!(encode_term("Turdus merula"), "Turdus+merula");
        assert_eq!(encode_term("gen:Larus q:A"), "gen%3ALarus+q%3AA");
        assert_eq!(encode_term("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_term("mésange"), "m%C3%A9sange");
        assert_eq!(encode_term("*-._"), "*-._");
        assert_eq!(encode_term(""), "");
    }

    #[test]
    fn test_query_url() {
        let fetcher = UpstreamFetcher::new(&UpstreamConfig {
            base_url: "http://127.0.0.1:9/api/2/recordings".into(),
            timeout_secs: None,
            use_system_proxy: false,
        })
        .unwrap();

        assert_eq!(
            fetcher.query_url(&encode_term("Parus major")),
            "http://127.0.0.1:9/api/2/recordings?query=Parus+major"
        );
        assert_eq!(
            fetcher.query_url(""),
            "http://127.0.0.1:9/api/2/recordings?query="
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = UpstreamFetcher::new(&UpstreamConfig {
            base_url: format!("http://{}/api/2/recordings", addr),
            timeout_secs: Some(5),
            use_system_proxy: false,
        })
        .unwrap();

        let err = fetcher.fetch("wren").await.unwrap_err();
        assert!(matches!(err, ProxyError::Transport(_)));
    }
}
