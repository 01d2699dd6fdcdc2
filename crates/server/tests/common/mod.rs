//! Process and upstream helpers shared by the integration tests.

#![allow(dead_code)]

use anyhow::Context as _;
use axum::Router;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use axum::routing::any;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::process::Child;
use std::time::{Duration, Instant};

pub const TEST_API_KEY: &str = "test-key";

pub struct KillOnDrop(pub Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
    }
}

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; it's still possible for another process
/// to bind it before you do.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}

/// Poll an HTTP URL until it returns a success status (2xx/3xx).
pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > timeout_dur {
            anyhow::bail!("timed out waiting for {url}");
        }

        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => tokio::time::sleep(Duration::from_millis(200)).await,
        }
    }
}

/// Absolute path of the bundled Mailgun API description.
pub fn spec_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/mailgun-openapi.yaml")
}

/// Spawn the server binary serving streamable HTTP against the given upstream.
pub fn spawn_server_http(upstream_url: &str, port: u16) -> anyhow::Result<Child> {
    let bin = env!("CARGO_BIN_EXE_mailgun-mcp-server");
    std::process::Command::new(bin)
        .arg("--spec")
        .arg(spec_path())
        .arg("--base-url")
        .arg(upstream_url)
        .arg("--transport")
        .arg("http")
        .arg("--port")
        .arg(port.to_string())
        .env("MAILGUN_API_KEY", TEST_API_KEY)
        .spawn()
        .context("spawn mailgun-mcp-server")
}

async fn echo_handler(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> axum::Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    axum::Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "authorization": header("authorization"),
        "content_type": header("content-type"),
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Serve an upstream that echoes every request back as JSON.
///
/// The server shuts down when the returned sender is dropped, so tests keep it
/// bound for their whole scope.
pub async fn spawn_echo_server() -> (String, tokio::sync::oneshot::Sender<()>) {
    let app = Router::new().route("/{*path}", any(echo_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind echo server");
    let addr = listener.local_addr().expect("local_addr");
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });
    tokio::spawn(async move { server.await });
    (format!("http://{addr}"), shutdown_tx)
}
