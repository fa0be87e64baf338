//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use request_logger::config::{AppConfig, LogConfig};
use request_logger::lifecycle::{self, Shutdown};
use request_logger::log_store::LogRecord;
use request_logger::LogStore;
use tempfile::TempDir;

/// A running server bound to an ephemeral port with its own log directory.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<LogStore>,
    pub dir: TempDir,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait for spawned capture tasks to bring the active file to `lines`.
    pub async fn wait_for_lines(&self, lines: usize) {
        wait_for_lines(&self.store, lines).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Boot the real server with `max_lines` as rotation threshold.
#[allow(dead_code)]
pub async fn start_server(max_lines: usize) -> TestServer {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.log.log_dir = dir.path().join("logs");
    config.log.max_lines = max_lines;

    let (server, listener) = lifecycle::start(config).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let store = server.store().clone();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        store,
        dir,
        shutdown,
    }
}

/// Client that never routes loopback traffic through a proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Open a store directly, without the HTTP layer.
#[allow(dead_code)]
pub fn open_store(dir: &TempDir, max_lines: usize) -> LogStore {
    LogStore::open(&LogConfig {
        log_dir: dir.path().join("logs"),
        log_file_name: "log.csv".into(),
        max_lines,
    })
    .unwrap()
}

#[allow(dead_code)]
pub fn record(agent: &str, resource: &str) -> LogRecord {
    LogRecord {
        agent: agent.into(),
        time: Utc::now(),
        method: "GET".into(),
        resource: resource.into(),
        version: "HTTP/1.1".into(),
        status: 200,
    }
}

#[allow(dead_code)]
pub async fn wait_for_lines(store: &LogStore, lines: usize) {
    for _ in 0..500 {
        if store.line_count() == lines && !store.is_rotating() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "log never reached {} lines (currently {})",
        lines,
        store.line_count()
    );
}
