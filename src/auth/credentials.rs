// Credential resolution from environment variables

use std::collections::HashMap;

use crate::error::{ConfigError, RequiredField};

use super::types::Credentials;

/// Optional manager (MCC) account variable
pub const MCC_ID_ENV: &str = "GOOGLE_ADS_MCC_ID";

/// Source of configuration values
///
/// Production code reads the process environment; tests use an in-memory map.
pub trait EnvSource: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads values from the process environment (including a loaded `.env`)
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory configuration source
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, String>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Resolve and validate credentials
///
/// Fails on the first missing required value, checked in the order
/// developer token, client id, client secret, refresh token.
pub fn resolve(source: &dyn EnvSource) -> Result<Credentials, ConfigError> {
    let developer_token = required(source, RequiredField::DeveloperToken)?;
    let client_id = required(source, RequiredField::ClientId)?;
    let client_secret = required(source, RequiredField::ClientSecret)?;
    let refresh_token = required(source, RequiredField::RefreshToken)?;

    let manager_account_id = match source.get(MCC_ID_ENV) {
        Some(raw) if !raw.trim().is_empty() => Some(format_customer_id(&raw)?),
        _ => None,
    };

    Ok(Credentials {
        developer_token,
        client_id,
        client_secret,
        refresh_token,
        manager_account_id,
    })
}

/// Strip dashes and whitespace from a customer id and require exactly 10 digits
///
/// `"123-456-7890"` becomes `"1234567890"`.
pub fn format_customer_id(customer_id: &str) -> Result<String, ConfigError> {
    let clean: String = customer_id
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    if clean.len() != 10 || !clean.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidCustomerIdFormat(customer_id.to_string()));
    }

    Ok(clean)
}

fn required(source: &dyn EnvSource, field: RequiredField) -> Result<String, ConfigError> {
    source
        .get(field.env_var())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(field))
}
