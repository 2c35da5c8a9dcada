// Connection health check
// Authenticates with the refresh token, lists accessible customers and
// classifies failures into stable error types

use crate::ads_client::AdsApi;
use crate::auth::{self, Credentials};
use crate::error::{AdsError, ConfigError};
use crate::models::status::{ConnectionStatus, ErrorType};

use super::ToolContext;

const DEVELOPER_TOKEN_MARKERS: &[&str] = &["developer token", "developer_token", "developer-token"];

const OAUTH_MARKERS: &[&str] = &[
    "invalid_grant",
    "invalid_client",
    "unauthorized_client",
    "unauthenticated",
    "authentication",
    "unauthorized",
    "credential",
    "oauth",
    "expired or revoked",
];

/// Only consulted when the text also mentions "customer"
const CUSTOMER_MARKERS: &[&str] = &["invalid", "format", "not found", "malformed", "does not exist"];

const ACCESS_MARKERS: &[&str] = &[
    "permission_denied",
    "permission denied",
    "permission",
    "access denied",
    "access_denied",
    "forbidden",
    "not allowed",
];

/// `check_connection` tool: resolve credentials, then probe
///
/// Configuration problems are returned as errors before any network call.
pub async fn check_connection(ctx: &ToolContext) -> Result<ConnectionStatus, ConfigError> {
    let creds = auth::resolve(ctx.env.as_ref())?;
    Ok(probe(ctx.api.as_ref(), &creds).await)
}

/// Authenticate and list accessible customers
///
/// Never fails: every outbound error is folded into an error status.
pub async fn probe(api: &dyn AdsApi, creds: &Credentials) -> ConnectionStatus {
    let mcc_account = creds.manager_account_id.clone();

    tracing::debug!(state = "authenticating", "Connection check started");
    let token = match api.authenticate(creds).await {
        Ok(token) => token,
        Err(e) => return failed(mcc_account, &e),
    };

    tracing::debug!(
        state = "probing",
        token = %token.preview(),
        "Listing accessible customers"
    );
    match api.list_accessible_customers(&token, creds).await {
        Ok(resource_names) => {
            let status = ConnectionStatus::connected(mcc_account, resource_names);
            tracing::info!(
                state = "connected",
                total_accessible_customers = status.total_accessible_customers,
                "Google Ads connection check succeeded"
            );
            status
        }
        Err(e) => failed(mcc_account, &e),
    }
}

fn failed(mcc_account: Option<String>, err: &AdsError) -> ConnectionStatus {
    let error_type = classify_error(err);
    tracing::warn!(
        state = "errored",
        error_type = error_type.as_str(),
        error = %err,
        "Google Ads connection check failed"
    );

    ConnectionStatus::error(
        mcc_account,
        error_type,
        format!("Failed to connect to Google Ads API: {}", err),
    )
}

/// Map an outbound failure to an error type
///
/// Structured Google Ads error codes win when any of them is recognized;
/// otherwise the canonical status, HTTP status and message text are
/// checked. Both passes use the same precedence: developer token, OAuth,
/// customer id, access.
pub fn classify_error(err: &AdsError) -> ErrorType {
    match err {
        AdsError::Transport { .. } | AdsError::Decode(_) => ErrorType::UnknownError,
        AdsError::OAuth {
            error, description, ..
        } => {
            let text = format!("{} {}", error, description.as_deref().unwrap_or_default());
            if contains_any(&text.to_lowercase(), DEVELOPER_TOKEN_MARKERS) {
                ErrorType::InvalidDeveloperToken
            } else {
                ErrorType::InvalidOauthCredentials
            }
        }
        AdsError::Api {
            status,
            api_status,
            error_codes,
            message,
            ..
        } => classify_codes(error_codes)
            .unwrap_or_else(|| classify_api_text(*status, api_status.as_deref(), message)),
    }
}

fn classify_codes(codes: &[String]) -> Option<ErrorType> {
    if codes.iter().any(|c| c.contains("DEVELOPER_TOKEN")) {
        return Some(ErrorType::InvalidDeveloperToken);
    }
    if codes
        .iter()
        .any(|c| c.starts_with("authenticationError.") && !c.contains("CUSTOMER"))
    {
        return Some(ErrorType::InvalidOauthCredentials);
    }
    if codes.iter().any(|c| {
        c.starts_with("customerError.")
            || c.ends_with("INVALID_CUSTOMER_ID")
            || c.ends_with("CUSTOMER_NOT_FOUND")
    }) {
        return Some(ErrorType::InvalidCustomerId);
    }
    if codes.iter().any(|c| c.starts_with("authorizationError.")) {
        return Some(ErrorType::AccessDenied);
    }
    None
}

fn classify_api_text(status: u16, api_status: Option<&str>, message: &str) -> ErrorType {
    let text = message.to_lowercase();

    if contains_any(&text, DEVELOPER_TOKEN_MARKERS) {
        ErrorType::InvalidDeveloperToken
    } else if status == 401
        || api_status == Some("UNAUTHENTICATED")
        || contains_any(&text, OAUTH_MARKERS)
    {
        ErrorType::InvalidOauthCredentials
    } else if text.contains("customer") && contains_any(&text, CUSTOMER_MARKERS) {
        ErrorType::InvalidCustomerId
    } else if status == 403
        || api_status == Some("PERMISSION_DENIED")
        || contains_any(&text, ACCESS_MARKERS)
    {
        ErrorType::AccessDenied
    } else {
        ErrorType::UnknownError
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}
