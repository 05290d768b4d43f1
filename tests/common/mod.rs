//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;

use pathmux::config::{ServerConfig, Variant};
use pathmux::lifecycle::{startup, Shutdown};
use tokio::net::TcpListener;

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    #[allow(dead_code)]
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
    }
}

/// Start a demo program with an optional asset directory.
pub async fn spawn_server(variant: Variant, assets: Option<PathBuf>) -> TestServer {
    let mut config = ServerConfig::default();
    config.app.variant = variant;
    config.assets.dir = assets.map(|p| p.to_string_lossy().into_owned());
    config.timeouts.request_secs = 5;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let handle = tokio::spawn(async move {
        startup::serve(config, listener, receiver).await.unwrap();
    });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Fresh directory under the system temp dir.
#[allow(dead_code)]
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pathmux-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
