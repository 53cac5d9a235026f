//! Shared utilities for integration testing.

use axum::http::StatusCode;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use xeno_proxy::{HttpServer, ProxyConfig, Shutdown};

/// Path the mock upstream pretends to serve.
pub const UPSTREAM_PATH: &str = "/api/2/recordings";

/// A running mock upstream that records every request target it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<AtomicU32>,
    targets: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, UPSTREAM_PATH)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Request targets (`path?query`) in arrival order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

/// Start a programmable mock upstream.
///
/// `f` receives the request target and returns the status and body to send.
pub async fn start_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicU32::new(0));
    let targets = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let (c, t) = (calls.clone(), targets.clone());
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let (f, calls, targets) = (f.clone(), c.clone(), t.clone());
            tokio::spawn(async move {
                let (read_half, mut write_half) = socket.into_split();
                let mut reader = BufReader::new(read_half);

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                    return;
                }
                // Drain headers.
                loop {
                    let mut line = String::new();
                    match reader.read_line(&mut line).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) if line == "\r\n" => break,
                        Ok(_) => {}
                    }
                }

                let target = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                targets.lock().unwrap().push(target.clone());
                calls.fetch_add(1, Ordering::SeqCst);

                let (status, body) = f(target).await;
                let reason = StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown");
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = write_half.write_all(response.as_bytes()).await;
                let _ = write_half.shutdown().await;
            });
        }
    });

    MockUpstream {
        addr,
        calls,
        targets,
    }
}

/// Mock upstream that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_fixed_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_upstream(move |_| async move { (status, body.to_string()) }).await
}

/// Config pointing at the given upstream, listening on an ephemeral port.
pub fn config_for(upstream_base: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream_base.to_string();
    config.upstream.timeout_secs = Some(10);
    config.upstream.use_system_proxy = false;
    config
}

/// Run the proxy in the background. Returns its address and shutdown handle.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let receiver = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
