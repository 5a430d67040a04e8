//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use prefix_router::lifecycle::{build_router, Shutdown};
use prefix_router::{HttpServer, RouteRequest, RouterConfig};
use tokio::net::TcpListener;

/// Minimal request handle that records what happened to it.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct TestRequest {
    pub method: String,
    pub path: String,
    pub log: Vec<String>,
    pub status: u16,
}

#[allow(dead_code)]
impl TestRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            log: Vec::new(),
            status: 200,
        }
    }
}

impl RouteRequest for TestRequest {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// Handler that appends `name` to the request log.
#[allow(dead_code)]
pub fn tag(name: &'static str) -> impl Fn(&mut TestRequest) + Send + Sync + 'static {
    move |req: &mut TestRequest| req.log.push(name.to_string())
}

/// Not-found responder used by integration tests.
#[allow(dead_code)]
pub fn not_found(req: &mut TestRequest) {
    req.status = 404;
}

/// Start the HTTP front end for `config` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(config: RouterConfig) -> (SocketAddr, Shutdown) {
    let router = build_router(&config).expect("route table should build");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(&config, Arc::new(router));
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
