// Authentication types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Complete credential set for one Google Ads session
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub developer_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,

    /// Manager (MCC) account, 10 digits without dashes
    pub manager_account_id: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("developer_token", &redact(&self.developer_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("manager_account_id", &self.manager_account_id)
            .finish()
    }
}

/// Short-lived OAuth2 access token
///
/// Lives for the duration of a single probe and is never cached.
#[derive(Clone)]
pub struct AccessToken {
    pub secret: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.secret)
    }

    /// Token prefix that is safe to log
    pub fn preview(&self) -> String {
        redact(&self.secret)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &self.preview())
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// OAuth2 token endpoint success response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}

/// OAuth2 token endpoint error response (RFC 6749 section 5.2)
#[derive(Debug, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(6).collect();
    format!("{}...", prefix)
}
