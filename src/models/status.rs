use serde::{Deserialize, Serialize};

/// Only refresh-token authentication is supported
pub const AUTHENTICATION_METHOD: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Connected,
    Error,
}

/// Runtime failure category reported by `check_connection`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    InvalidDeveloperToken,
    InvalidOauthCredentials,
    InvalidCustomerId,
    AccessDenied,
    UnknownError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidDeveloperToken => "invalid_developer_token",
            ErrorType::InvalidOauthCredentials => "invalid_oauth_credentials",
            ErrorType::InvalidCustomerId => "invalid_customer_id",
            ErrorType::AccessDenied => "access_denied",
            ErrorType::UnknownError => "unknown_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibleCustomer {
    pub customer_id: String,
    pub resource_name: String,
}

impl AccessibleCustomer {
    /// `customers/1234567890` has customer id `1234567890`
    pub fn from_resource_name(resource_name: impl Into<String>) -> Self {
        let resource_name = resource_name.into();
        let customer_id = resource_name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            customer_id,
            resource_name,
        }
    }
}

/// Result of a single `check_connection` invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub status: Status,
    pub authentication_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcc_account: Option<String>,
    pub total_accessible_customers: usize,
    pub accessible_customers: Vec<AccessibleCustomer>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
}

impl ConnectionStatus {
    pub fn connected(mcc_account: Option<String>, resource_names: Vec<String>) -> Self {
        let accessible_customers: Vec<AccessibleCustomer> = resource_names
            .into_iter()
            .map(AccessibleCustomer::from_resource_name)
            .collect();

        Self {
            status: Status::Connected,
            authentication_method: AUTHENTICATION_METHOD.to_string(),
            mcc_account,
            total_accessible_customers: accessible_customers.len(),
            accessible_customers,
            message: "Successfully authenticated with Google Ads API".to_string(),
            error_type: None,
        }
    }

    pub fn error(mcc_account: Option<String>, error_type: ErrorType, message: String) -> Self {
        Self {
            status: Status::Error,
            authentication_method: AUTHENTICATION_METHOD.to_string(),
            mcc_account,
            total_accessible_customers: 0,
            accessible_customers: Vec::new(),
            message,
            error_type: Some(error_type),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == Status::Connected
    }
}
