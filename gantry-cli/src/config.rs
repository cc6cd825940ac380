//! Configuration module
//!
//! Handles CLI configuration: server address, credentials and transport
//! settings collected from flags and their environment fallbacks.

use std::time::Duration;

use gantry_client::ClientConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the CI server
    pub server_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub insecure: bool,
    pub timeout: Duration,
}

impl Config {
    /// Client settings; a token wins over username and password
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.server_url)
            .with_timeout(self.timeout)
            .with_insecure(self.insecure);

        match (&self.token, &self.username) {
            (Some(token), _) if !token.is_empty() => config.with_bearer_token(token),
            (_, Some(username)) if !username.is_empty() => {
                config.with_basic_auth(username, self.password.clone().unwrap_or_default())
            }
            _ => config,
        }
    }
}
