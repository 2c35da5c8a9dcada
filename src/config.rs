use anyhow::Result;
use clap::Parser;

/// Google Ads MCP Server - connection check over stdio
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Google Ads API version
    #[arg(long, env = "GOOGLE_ADS_API_VERSION", default_value = "v21")]
    pub api_version: String,

    /// Google Ads API base URL
    #[arg(
        long,
        env = "GOOGLE_ADS_API_BASE_URL",
        default_value = "https://googleads.googleapis.com"
    )]
    pub api_base_url: String,

    /// OAuth2 token endpoint
    #[arg(
        long,
        env = "GOOGLE_OAUTH_TOKEN_URI",
        default_value = "https://oauth2.googleapis.com/token"
    )]
    pub token_uri: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub http_timeout: u64,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub connect_timeout: u64,

    /// Skip the authentication check at startup
    #[arg(long, env = "SKIP_STARTUP_CHECK")]
    pub skip_startup_check: bool,
}

/// Endpoints and timeouts for the outbound Google Ads client
#[derive(Clone, Debug, PartialEq)]
pub struct ApiSettings {
    pub token_uri: String,
    pub api_base_url: String,
    pub api_version: String,
    pub request_timeout: u64,
    pub connect_timeout: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: String,
    pub api: ApiSettings,
    pub skip_startup_check: bool,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    ///
    /// Credentials are not part of this; they are resolved on every tool call.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Self::from_args(CliArgs::parse()))
    }

    pub fn from_args(args: CliArgs) -> Self {
        Config {
            log_level: args.log_level,
            api: ApiSettings {
                token_uri: args.token_uri,
                api_base_url: args.api_base_url,
                api_version: args.api_version,
                request_timeout: args.http_timeout,
                connect_timeout: args.connect_timeout,
            },
            skip_startup_check: args.skip_startup_check,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !is_valid_api_version(&self.api.api_version) {
            anyhow::bail!(
                "GOOGLE_ADS_API_VERSION must look like 'v21', got: {}",
                self.api.api_version
            );
        }

        for (name, url) in [
            ("GOOGLE_ADS_API_BASE_URL", &self.api.api_base_url),
            ("GOOGLE_OAUTH_TOKEN_URI", &self.api.token_uri),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("{} must be an http(s) URL, got: {}", name, url);
            }
        }

        if self.api.request_timeout == 0 {
            anyhow::bail!("HTTP_REQUEST_TIMEOUT must be greater than zero");
        }

        if self.api.connect_timeout == 0 {
            anyhow::bail!("HTTP_CONNECT_TIMEOUT must be greater than zero");
        }

        Ok(())
    }
}

/// `v` followed by one or more digits
fn is_valid_api_version(version: &str) -> bool {
    version
        .strip_prefix('v')
        .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
