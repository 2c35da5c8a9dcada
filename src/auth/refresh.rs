// OAuth2 refresh token exchange

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;

use crate::error::AdsError;

use super::types::{AccessToken, Credentials, TokenErrorResponse, TokenResponse};

/// Exchange the long-lived refresh token for an access token
///
/// One request, no retries. Non-2xx responses are decoded from the
/// standard OAuth2 error body when possible.
pub async fn exchange_refresh_token(
    client: &Client,
    token_uri: &str,
    creds: &Credentials,
) -> Result<AccessToken, AdsError> {
    tracing::debug!(
        token_uri = %token_uri,
        client_id = %creds.client_id,
        "Exchanging refresh token for access token"
    );

    let form = [
        ("grant_type", "refresh_token"),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("refresh_token", creds.refresh_token.as_str()),
    ];

    let response = client
        .post(token_uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .form(&form)
        .send()
        .await
        .map_err(|e| AdsError::from_transport(&e))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = status.as_u16(),
            body = %error_text,
            "OAuth token exchange rejected"
        );
        return Err(parse_token_error(status.as_u16(), &error_text));
    }

    let data: TokenResponse = response
        .json()
        .await
        .map_err(|e| AdsError::Decode(format!("token response: {}", e)))?;

    if data.access_token.is_empty() {
        return Err(AdsError::Decode(
            "token response does not contain access_token".to_string(),
        ));
    }

    // Google issues one-hour tokens unless told otherwise
    let expires_in = data.expires_in.unwrap_or(3600);
    let expires_at = token_expiry(expires_in)?;

    let token = AccessToken {
        secret: data.access_token,
        token_type: data.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_at,
    };

    tracing::debug!(
        token = %token.preview(),
        expires_at = %token.expires_at.to_rfc3339(),
        "Access token acquired"
    );

    Ok(token)
}

/// Absolute expiry for a relative `expires_in`, rejecting values chrono cannot represent
fn token_expiry(expires_in: u64) -> Result<DateTime<Utc>, AdsError> {
    i64::try_from(expires_in)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| {
            AdsError::Decode(format!(
                "token response has out-of-range expires_in: {}",
                expires_in
            ))
        })
}

/// Decode an OAuth2 error body, falling back to the raw text
fn parse_token_error(status: u16, body: &str) -> AdsError {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(parsed) => AdsError::OAuth {
            status,
            error: parsed.error,
            description: parsed.error_description,
        },
        Err(_) => AdsError::OAuth {
            status,
            error: "token_request_failed".to_string(),
            description: Some(body.trim().to_string()).filter(|s| !s.is_empty()),
        },
    }
}
