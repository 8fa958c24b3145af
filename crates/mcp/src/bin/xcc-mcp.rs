// Standalone MCP server binary

use std::sync::Arc;

use anyhow::{Context, Result};
use xcc_client::XcodeCloudClient;
use xcc_mcp::{build_registry, McpServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout is reserved for the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Xcode Cloud MCP server starting...");

    let client = XcodeCloudClient::from_env().context(
        "App Store Connect credentials missing. Set APP_STORE_KEY_ID, \
         APP_STORE_ISSUER_ID, and APP_STORE_PRIVATE_KEY.",
    )?;

    let client = Arc::new(client);
    let registry = build_registry(client.clone());
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry, client);
    server.run().await?;

    Ok(())
}
