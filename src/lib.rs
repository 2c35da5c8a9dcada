// Google Ads MCP - Library root for testing

pub mod ads_client;
pub mod auth;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
