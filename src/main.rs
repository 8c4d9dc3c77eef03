// MCP stdio server: pagescout web-browsing tools
//
// Stdout carries the MCP transport, so all logging goes to stderr.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    pagescout::serve_stdio(pagescout::ScoutConfig::default()).await
}
