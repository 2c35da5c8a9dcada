use anyhow::Result;
use std::sync::Arc;

use google_ads_mcp::ads_client::{AdsApi, GoogleAdsClient};
use google_ads_mcp::auth::{self, EnvSource, ProcessEnv};
use google_ads_mcp::config::Config;
use google_ads_mcp::mcp::McpServer;
use google_ads_mcp::tools::ToolContext;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = Config::load()?;
    config.validate()?;

    // stdout carries the protocol, so logs go to stderr
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Google Ads MCP Server starting...");
    tracing::debug!(
        api_version = %config.api.api_version,
        api_base_url = %config.api.api_base_url,
        "API configured"
    );

    let api: Arc<dyn AdsApi> = Arc::new(GoogleAdsClient::new(&config.api)?);
    let env: Arc<dyn EnvSource> = Arc::new(ProcessEnv);

    if config.skip_startup_check {
        tracing::info!("Startup authentication check skipped");
    } else {
        verify_authentication(api.as_ref(), env.as_ref()).await;
    }

    let server = McpServer::new(ToolContext { api, env });
    tracing::info!("Serving MCP on stdio");
    server.serve_stdio().await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Try the refresh token once so misconfiguration shows up in the logs early
///
/// Failures are logged only; `check_connection` reports them to the client.
async fn verify_authentication(api: &dyn AdsApi, env: &dyn EnvSource) {
    tracing::info!("Initializing Google Ads authentication...");

    let creds = match auth::resolve(env) {
        Ok(creds) => creds,
        Err(e) => {
            tracing::error!(code = e.code(), "Configuration error: {}", e);
            tracing::warn!("Server will start but check_connection will report the error");
            return;
        }
    };

    if let Some(ref mcc) = creds.manager_account_id {
        tracing::info!("Using MCC account: {}", mcc);
    }

    match api.authenticate(&creds).await {
        Ok(token) => {
            tracing::info!(
                "Authentication successful (token: {}, expires: {})",
                token.preview(),
                token.expires_at.to_rfc3339()
            );
        }
        Err(e) => {
            tracing::error!("Authentication failed: {}", e);
            tracing::warn!("Server will start but Google Ads calls will fail without valid credentials");
        }
    }
}
