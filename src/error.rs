// Error handling module
// Defines configuration errors and outbound Google Ads API errors

use std::fmt;

use thiserror::Error;

/// Required credential that must be present in the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    DeveloperToken,
    ClientId,
    ClientSecret,
    RefreshToken,
}

impl RequiredField {
    /// Environment variable the field is read from
    pub fn env_var(self) -> &'static str {
        match self {
            RequiredField::DeveloperToken => "GOOGLE_ADS_DEVELOPER_TOKEN",
            RequiredField::ClientId => "GOOGLE_CLIENT_ID",
            RequiredField::ClientSecret => "GOOGLE_CLIENT_SECRET",
            RequiredField::RefreshToken => "GOOGLE_ADS_REFRESH_TOKEN",
        }
    }

    /// Stable error code reported when the field is missing
    pub fn missing_code(self) -> &'static str {
        match self {
            RequiredField::DeveloperToken => "missing_developer_token",
            RequiredField::ClientId => "missing_client_id",
            RequiredField::ClientSecret => "missing_client_secret",
            RequiredField::RefreshToken => "missing_refresh_token",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Local configuration errors, raised before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required credential is absent or blank
    #[error("{0} is required")]
    Missing(RequiredField),

    /// Manager account id is not 10 digits after normalization
    #[error("Customer ID must be exactly 10 digits, got: {0}")]
    InvalidCustomerIdFormat(String),
}

impl ConfigError {
    /// Machine-readable code, e.g. `missing_developer_token`
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Missing(field) => field.missing_code(),
            ConfigError::InvalidCustomerIdFormat(_) => "invalid_customer_id_format",
        }
    }
}

/// Failures of the outbound OAuth / Google Ads calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdsError {
    /// Token endpoint rejected the refresh token exchange
    #[error("OAuth token exchange failed: {status} - {error}{}", describe(.description))]
    OAuth {
        status: u16,
        error: String,
        description: Option<String>,
    },

    /// Google Ads API returned an error envelope
    #[error("Google Ads API error: {status} - {message}{}", list_codes(.error_codes))]
    Api {
        status: u16,
        api_status: Option<String>,
        error_codes: Vec<String>,
        message: String,
        request_id: Option<String>,
    },

    /// Request never produced an HTTP response
    #[error("HTTP request failed: {message} (kind: {kind})")]
    Transport { kind: &'static str, message: String },

    /// Successful response with an unreadable body
    #[error("Failed to decode Google Ads API response: {0}")]
    Decode(String),
}

impl AdsError {
    /// Build a transport error from a reqwest failure
    pub fn from_transport(e: &reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            "timeout"
        } else if e.is_connect() {
            "connection_failed"
        } else if e.is_request() {
            "request_error"
        } else if e.is_body() {
            "body_error"
        } else if e.is_decode() {
            "decode_error"
        } else {
            "unknown"
        };

        AdsError::Transport {
            kind,
            message: e.to_string(),
        }
    }
}

fn describe(description: &Option<String>) -> String {
    match description {
        Some(d) if !d.is_empty() => format!(": {}", d),
        _ => String::new(),
    }
}

fn list_codes(codes: &[String]) -> String {
    if codes.is_empty() {
        String::new()
    } else {
        format!(" [{}]", codes.join(", "))
    }
}
