// Authentication module
// Resolves credentials from the environment and exchanges refresh tokens

mod credentials;
mod refresh;
mod types;

pub use credentials::{format_customer_id, resolve, EnvSource, MapEnv, ProcessEnv};
pub use refresh::exchange_refresh_token;
pub use types::{AccessToken, Credentials};
