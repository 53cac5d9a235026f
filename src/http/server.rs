//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the lookup and health handlers
//! - Wire up middleware (tracing, request ID)
//! - Serve on a bound listener until shutdown

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::cache::ResponseCache;
use crate::config::ProxyConfig;
use crate::error::ProxyResult;
use crate::http::handlers::{health, lookup_birds};
use crate::lookup::LookupService;

/// Path of the health endpoint.
pub const HEALTH_ROUTE: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub lookups: LookupService,
    pub allow_any_origin: bool,
}

/// HTTP server for the lookup proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    cache: ResponseCache,
}

impl HttpServer {
    /// Create a new HTTP server with an empty cache.
    pub fn new(config: ProxyConfig) -> ProxyResult<Self> {
        Self::with_cache(config, ResponseCache::new())
    }

    /// Create a server around an existing cache handle.
    pub fn with_cache(config: ProxyConfig, cache: ResponseCache) -> ProxyResult<Self> {
        let state = AppState {
            lookups: LookupService::new(&config, cache.clone())?,
            allow_any_origin: config.response.allow_any_origin,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            cache,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.listener.route, get(lookup_birds))
            .route(HEALTH_ROUTE, get(health))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until shutdown fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route = %self.config.listener.route,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!(cached_terms = self.cache.len(), "HTTP server stopped");
        Ok(())
    }

    /// Get the cache handle shared with the handlers.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
