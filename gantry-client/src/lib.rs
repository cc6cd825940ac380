//! Gantry HTTP Client
//!
//! A type-safe HTTP client for the CI server's pipeline config API.
//!
//! [`ServerClient`] implements [`gantry_core::PipelineConfigService`], so it
//! plugs straight into a [`gantry_core::Reconciler`].
//!
//! # Example
//!
//! ```no_run
//! use gantry_client::{ClientConfig, ServerClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::new("https://ci.example.com").with_bearer_token("token");
//!     let client = ServerClient::from_config(&config)?;
//!
//!     if let Some(found) = client.get_pipeline_config("app").await? {
//!         println!("app is at version {}", found.etag);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod pipelines;

// Re-export commonly used types
pub use config::{Auth, ClientConfig};
pub use error::{ClientError, Result};
pub use pipelines::PIPELINE_CONFIG_MEDIA_TYPE;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;

/// Error body the API sends with most failures
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// HTTP client for the CI server API
#[derive(Debug, Clone)]
pub struct ServerClient {
    /// Base URL of the server (e.g., "https://ci.example.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
    auth: Option<Auth>,
}

impl ServerClient {
    /// Create a new client with default HTTP settings and no credentials
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the server (e.g., "https://ci.example.com")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the server
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth: None,
        }
    }

    /// Build a client from connection settings
    ///
    /// Applies the timeout, user agent, TLS verification and credentials.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone());

        if config.insecure {
            tracing::warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = Self::with_client(&config.server_url, builder.build()?);
        Ok(match &config.auth {
            Some(auth) => client.with_auth(auth.clone()),
            None => client,
        })
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join percent-encoded path segments onto the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid server URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!("server URL '{}' cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request with credentials and the API media type
    fn request(&self, method: Method, segments: &[&str], media_type: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url);

        let builder = self.client.request(method, url).header(ACCEPT, media_type);
        Ok(match &self.auth {
            Some(Auth::Basic { username, password }) => builder.basic_auth(username, Some(password)),
            Some(Auth::Bearer(token)) => builder.bearer_auth(token),
            None => builder,
        })
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Turn a non-success status into an error, passing successes through
    ///
    /// 412 Precondition Failed maps to [`ClientError::Conflict`]. A JSON
    /// `{"message": ...}` body is unwrapped, anything else is kept as text.
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let error_text = serde_json::from_str::<ApiMessage>(&error_text)
            .map(|body| body.message)
            .unwrap_or(error_text);

        if status == StatusCode::PRECONDITION_FAILED {
            return Err(ClientError::Conflict(error_text));
        }
        Err(ClientError::api_error(status.as_u16(), error_text))
    }
}
