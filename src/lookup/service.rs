//! Cache-then-forward lookup path.

use std::sync::Arc;

use crate::cache::{InFlight, ResponseCache};
use crate::config::{MalformedBodyPolicy, ProxyConfig, TransformConfig};
use crate::error::ProxyResult;
use crate::observability::metrics;
use crate::transform::rewrite_recordings;
use crate::upstream::{encode_term, UpstreamFetcher};

/// Where a served body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Upstream,
    /// Shared the upstream fetch started by a concurrent request.
    InFlight,
}

impl LookupSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupSource::Cache => "cache",
            LookupSource::Upstream => "upstream",
            LookupSource::InFlight => "in_flight",
        }
    }
}

/// A body ready to be served for a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub body: String,
    pub source: LookupSource,
}

/// Resolves terms from the cache, falling back to the upstream API.
///
/// Without coalescing, two concurrent misses for one term both fetch and
/// the later store wins.
#[derive(Clone)]
pub struct LookupService {
    cache: ResponseCache,
    fetcher: UpstreamFetcher,
    transform: TransformConfig,
    inflight: Option<Arc<InFlight>>,
}

impl LookupService {
    pub fn new(config: &ProxyConfig, cache: ResponseCache) -> ProxyResult<Self> {
        let inflight = config
            .cache
            .coalesce_in_flight
            .then(|| Arc::new(InFlight::new()));

        Ok(Self {
            cache,
            fetcher: UpstreamFetcher::new(&config.upstream)?,
            transform: config.transform.clone(),
            inflight,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Resolve a raw term to a response body.
    pub async fn lookup(&self, term: &str) -> ProxyResult<Lookup> {
        if let Some(body) = self.cache.lookup(term) {
            metrics::record_cache_lookup("hit");
            return Ok(Lookup {
                body,
                source: LookupSource::Cache,
            });
        }
        metrics::record_cache_lookup("miss");

        let Some(inflight) = &self.inflight else {
            return Ok(Lookup {
                body: self.populate(term).await?,
                source: LookupSource::Upstream,
            });
        };

        let this = self.clone();
        let owned = term.to_string();
        let outcome = inflight
            .run(term, move || async move {
                // A fetch for this term may have finished since the miss above.
                match this.cache.lookup(&owned) {
                    Some(body) => Ok(body),
                    None => this.populate(&owned).await,
                }
            })
            .await;

        Ok(Lookup {
            body: outcome.result?,
            source: if outcome.joined {
                LookupSource::InFlight
            } else {
                LookupSource::Upstream
            },
        })
    }

    /// Fetch, rewrite and store. Nothing is stored on error.
    async fn populate(&self, term: &str) -> ProxyResult<String> {
        let raw = self.fetcher.fetch(&encode_term(term)).await?;
        let body = self.prepare(term, raw)?;
        self.cache.store(term, body.clone());
        tracing::debug!(term = %term, cached_terms = self.cache.len(), "Cached lookup");
        Ok(body)
    }

    fn prepare(&self, term: &str, raw: String) -> ProxyResult<String> {
        if !self.transform.enabled {
            return Ok(raw);
        }

        match rewrite_recordings(&raw) {
            Ok(body) => Ok(body),
            Err(e) if self.transform.on_malformed == MalformedBodyPolicy::Passthrough => {
                tracing::warn!(term = %term, error = %e, "Serving upstream body unmodified");
                Ok(raw)
            }
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "Rejecting upstream body");
                Err(e)
            }
        }
    }
}
