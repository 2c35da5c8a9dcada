// Data models for the tool output and Google Ads wire formats

pub mod google_ads;
pub mod status;
