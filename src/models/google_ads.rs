use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

// ==================================================================================================
// Response Models
// ==================================================================================================

/// `customers:listAccessibleCustomers` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccessibleCustomersResponse {
    #[serde(default)]
    pub resource_names: Vec<String>,
}

// ==================================================================================================
// Error Models
// ==================================================================================================

/// Google API error envelope: `{"error": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    /// Canonical status such as `UNAUTHENTICATED` or `PERMISSION_DENIED`
    pub status: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

/// One entry of `error.details`; only `GoogleAdsFailure` entries carry `errors`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    #[serde(default)]
    pub errors: Vec<GoogleAdsError>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAdsError {
    /// Single-entry map, e.g. `{"authenticationError": "NOT_ADS_USER"}`
    #[serde(default)]
    pub error_code: BTreeMap<String, Value>,
    #[serde(default)]
    pub message: String,
}

impl ErrorEnvelope {
    /// Flattened error codes, e.g. `authorizationError.USER_PERMISSION_DENIED`
    pub fn error_codes(&self) -> Vec<String> {
        self.failures()
            .flat_map(|e| e.error_code.iter())
            .map(|(category, value)| match value.as_str() {
                Some(code) => format!("{}.{}", category, code),
                None => format!("{}.{}", category, value),
            })
            .collect()
    }

    /// Most specific human-readable message available
    pub fn message(&self) -> String {
        let messages: Vec<&str> = self
            .failures()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
            .collect();

        if messages.is_empty() {
            self.error.message.clone()
        } else {
            messages.join("; ")
        }
    }

    pub fn request_id(&self) -> Option<String> {
        self.error
            .details
            .iter()
            .find_map(|d| d.request_id.clone())
    }

    fn failures(&self) -> impl Iterator<Item = &GoogleAdsError> {
        self.error.details.iter().flat_map(|d| d.errors.iter())
    }
}
