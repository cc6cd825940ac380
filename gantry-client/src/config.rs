//! Client configuration
//!
//! Connection settings for the CI server: address, credentials, timeout
//! and TLS verification.

use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials sent with every request
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// Server connection configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://ci.example.com")
    pub server_url: String,

    pub auth: Option<Auth>,

    /// Maximum time a single request may take
    pub timeout: Duration,

    /// Skip TLS certificate verification
    pub insecure: bool,

    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
            user_agent: format!("gantry/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GANTRY_SERVER_URL (required)
    /// - GANTRY_TOKEN (optional, bearer token; wins over basic auth)
    /// - GANTRY_USERNAME / GANTRY_PASSWORD (optional, basic auth)
    /// - GANTRY_INSECURE (optional, "true" or "1", default: false)
    /// - GANTRY_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_url = lookup("GANTRY_SERVER_URL")
            .ok_or_else(|| anyhow::anyhow!("GANTRY_SERVER_URL environment variable not set"))?;

        let mut config = Self::new(server_url);

        if let Some(token) = lookup("GANTRY_TOKEN").filter(|t| !t.is_empty()) {
            config = config.with_bearer_token(token);
        } else if let Some(username) = lookup("GANTRY_USERNAME").filter(|u| !u.is_empty()) {
            let password = lookup("GANTRY_PASSWORD").unwrap_or_default();
            config = config.with_basic_auth(username, password);
        }

        config.insecure = lookup("GANTRY_INSECURE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1"))
            .unwrap_or(false);

        if let Some(raw) = lookup("GANTRY_TIMEOUT") {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("GANTRY_TIMEOUT must be a number of seconds, got '{}'", raw))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Bearer(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server_url.is_empty() {
            anyhow::bail!("server_url cannot be empty");
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            anyhow::bail!("server_url must start with http:// or https://");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        if let Some(Auth::Basic { username, .. }) = &self.auth
            && username.is_empty()
        {
            anyhow::bail!("username cannot be empty when using basic auth");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_new_config_defaults() {
        let config = ClientConfig::new("https://ci.example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.insecure);
        assert!(config.auth.is_none());
        assert!(config.user_agent.starts_with("gantry/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_requires_server_url() {
        assert!(ClientConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_from_lookup_reads_everything() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("GANTRY_SERVER_URL", "https://ci.example.com"),
            ("GANTRY_USERNAME", "admin"),
            ("GANTRY_PASSWORD", "secret"),
            ("GANTRY_INSECURE", "TRUE"),
            ("GANTRY_TIMEOUT", "5"),
        ]))
        .unwrap();

        assert_eq!(
            config.auth,
            Some(Auth::Basic {
                username: "admin".into(),
                password: "secret".into()
            })
        );
        assert!(config.insecure);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_token_wins_over_basic_auth() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("GANTRY_SERVER_URL", "https://ci.example.com"),
            ("GANTRY_USERNAME", "admin"),
            ("GANTRY_TOKEN", "abc"),
        ]))
        .unwrap();
        assert_eq!(config.auth, Some(Auth::Bearer("abc".into())));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result = ClientConfig::from_lookup(lookup(&[
            ("GANTRY_SERVER_URL", "https://ci.example.com"),
            ("GANTRY_TIMEOUT", "soon"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("ci.example.com").validate().is_err());
        assert!(
            ClientConfig::new("https://ci.example.com")
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
        assert!(
            ClientConfig::new("https://ci.example.com")
                .with_basic_auth("", "x")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_debug_hides_credentials() {
        let basic = format!("{:?}", Auth::Basic {
            username: "admin".into(),
            password: "hunter2".into()
        });
        assert!(basic.contains("admin"));
        assert!(!basic.contains("hunter2"));
        assert!(!format!("{:?}", Auth::Bearer("tok".into())).contains("tok"));
    }
}
