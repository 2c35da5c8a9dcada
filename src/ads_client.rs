use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

use crate::auth::{exchange_refresh_token, AccessToken, Credentials};
use crate::config::ApiSettings;
use crate::error::AdsError;
use crate::models::google_ads::{ErrorEnvelope, ListAccessibleCustomersResponse};

/// Outbound Google Ads capability used by the connection probe
#[async_trait]
pub trait AdsApi: Send + Sync {
    /// Exchange the refresh token for a fresh access token
    async fn authenticate(&self, creds: &Credentials) -> Result<AccessToken, AdsError>;

    /// Resource names of every customer the token's user can access
    async fn list_accessible_customers(
        &self,
        token: &AccessToken,
        creds: &Credentials,
    ) -> Result<Vec<String>, AdsError>;
}

/// Google Ads REST client
///
/// Holds only the connection pool and endpoints; credentials and tokens
/// are passed per call.
pub struct GoogleAdsClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// OAuth2 token endpoint
    token_uri: String,

    /// e.g. `https://googleads.googleapis.com`
    api_base_url: String,

    /// e.g. `v21`
    api_version: String,
}

impl GoogleAdsClient {
    /// Create a new client
    pub fn new(settings: &ApiSettings) -> Result<Self, AdsError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout))
            .timeout(Duration::from_secs(settings.request_timeout))
            .user_agent(concat!("google-ads-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdsError::from_transport(&e))?;

        Ok(Self {
            client,
            token_uri: settings.token_uri.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            api_version: settings.api_version.clone(),
        })
    }

    fn list_accessible_customers_url(&self) -> String {
        format!(
            "{}/{}/customers:listAccessibleCustomers",
            self.api_base_url, self.api_version
        )
    }
}

#[async_trait]
impl AdsApi for GoogleAdsClient {
    async fn authenticate(&self, creds: &Credentials) -> Result<AccessToken, AdsError> {
        exchange_refresh_token(&self.client, &self.token_uri, creds).await
    }

    async fn list_accessible_customers(
        &self,
        token: &AccessToken,
        creds: &Credentials,
    ) -> Result<Vec<String>, AdsError> {
        let url = self.list_accessible_customers_url();

        let mut request = self
            .client
            .get(&url)
            .header("Authorization", token.authorization())
            .header("developer-token", &creds.developer_token);

        if let Some(ref mcc) = creds.manager_account_id {
            request = request.header("login-customer-id", mcc);
        }

        tracing::debug!(
            url = %url,
            login_customer_id = creds.manager_account_id.as_deref().unwrap_or("none"),
            "Sending HTTP request"
        );

        let response = request.send().await.map_err(|e| {
            let err = AdsError::from_transport(&e);
            tracing::warn!(error = %err, url = %url, "HTTP request error");
            err
        })?;

        let status = response.status();
        let request_id = header_request_id(&response);

        tracing::debug!(
            status = %status,
            request_id = request_id.as_deref().unwrap_or("-"),
            "Received HTTP response"
        );

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                request_id = request_id.as_deref().unwrap_or("-"),
                response_body = %error_text,
                "Google Ads API returned an error response"
            );
            return Err(parse_api_error(status.as_u16(), &error_text, request_id));
        }

        let data: ListAccessibleCustomersResponse = response
            .json()
            .await
            .map_err(|e| AdsError::Decode(e.to_string()))?;

        Ok(data.resource_names)
    }
}

fn header_request_id(response: &Response) -> Option<String> {
    response
        .headers()
        .get("request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Decode a Google Ads error body, keeping raw text when it is not JSON
fn parse_api_error(status: u16, body: &str, request_id: Option<String>) -> AdsError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => AdsError::Api {
            status,
            api_status: envelope.error.status.clone(),
            error_codes: envelope.error_codes(),
            message: envelope.message(),
            request_id: request_id.or_else(|| envelope.request_id()),
        },
        Err(_) => AdsError::Api {
            status,
            api_status: None,
            error_codes: Vec::new(),
            message: body.trim().to_string(),
            request_id,
        },
    }
}
