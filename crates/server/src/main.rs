//! Mailgun MCP server binary.
//!
//! Loads the bundled Mailgun OpenAPI description, registers one MCP tool per
//! supported endpoint, and serves them over stdio (the default) or streamable
//! HTTP.

mod endpoints;
mod service;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use mailgun_openapi_tools::document::ApiDocument;
use mailgun_openapi_tools::runtime::{MailgunToolSource, SourceConfig};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use service::MailgunMcpServer;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "mailgun-mcp-server")]
#[command(about = "Expose the Mailgun API as MCP tools", long_about = None)]
struct Args {
    /// Path to the Mailgun OpenAPI description (JSON or YAML)
    #[arg(
        long,
        env = "MAILGUN_SPEC_PATH",
        default_value = "assets/mailgun-openapi.yaml"
    )]
    spec: PathBuf,

    /// Base URL requests are sent to
    #[arg(long, env = "MAILGUN_BASE_URL", default_value = "https://api.mailgun.net")]
    base_url: Url,

    /// Transport to serve MCP over
    #[arg(long, value_enum, default_value = "stdio")]
    transport: Transport,

    /// Host to bind the HTTP transport to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP transport
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Emit logs as JSON instead of human-readable text
    #[arg(long)]
    json_logs: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Transport {
    Stdio,
    Http,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);
    match run(args).await {
        Ok(()) => Ok(()),
        // MAILGUN_MCP_TEST propagates fatal errors to the caller instead of
        // terminating, so a test harness can inspect them.
        Err(e) if std::env::var_os("MAILGUN_MCP_TEST").is_some() => Err(e),
        Err(e) => {
            tracing::error!("Fatal: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so the stdio transport keeps stdout for JSON-RPC frames.
fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let api_key = std::env::var("MAILGUN_API_KEY")
        .context("MAILGUN_API_KEY must be set to a Mailgun API key")?;

    let document = ApiDocument::from_file(&args.spec).with_context(|| {
        format!(
            "Failed to load the API description from {}",
            args.spec.display()
        )
    })?;

    let source = Arc::new(MailgunToolSource::new(
        &document,
        endpoints::ENDPOINTS,
        SourceConfig {
            base_url: args.base_url.clone(),
            api_key,
        },
    ));

    match args.transport {
        Transport::Stdio => serve_stdio(source).await,
        Transport::Http => serve_http(source, &args.host, args.port).await,
    }
}

async fn serve_stdio(source: Arc<MailgunToolSource>) -> anyhow::Result<()> {
    tracing::info!("Serving MCP over stdio");
    let service = rmcp::serve_server(MailgunMcpServer::new(source), rmcp::transport::stdio())
        .await
        .context("Failed to start the stdio transport")?;
    service.waiting().await?;
    Ok(())
}

async fn serve_http(source: Arc<MailgunToolSource>, host: &str, port: u16) -> anyhow::Result<()> {
    let mcp_service = StreamableHttpService::new(
        move || Ok(MailgunMcpServer::new(source.clone())),
        Arc::new(LocalSessionManager::default()),
        Default::default(),
    );

    let router = Router::new()
        .nest_service("/mcp", mcp_service)
        .route("/health", get(health));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Serving MCP over streamable HTTP on http://{addr}/mcp");

    axum::serve(listener, router).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}
