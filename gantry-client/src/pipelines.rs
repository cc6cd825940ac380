//! Pipeline config API endpoints

use async_trait::async_trait;
use gantry_core::codec::{decode_pipeline, encode_pipeline};
use gantry_core::dto::{CreatePipelineRequest, PipelineConfig};
use gantry_core::reconcile::{PipelineConfigService, ServiceError, Versioned};
use reqwest::header::{CONTENT_TYPE, ETAG, IF_MATCH};
use reqwest::{Method, StatusCode};

use crate::ServerClient;
use crate::error::{ClientError, Result};

/// Versioned media type of the pipeline config API
pub const PIPELINE_CONFIG_MEDIA_TYPE: &str = "application/vnd.go.cd.v11+json";

const PIPELINES_PATH: [&str; 4] = ["go", "api", "admin", "pipelines"];

/// Path segments of one pipeline; the name is escaped as a single segment
fn pipeline_path(name: &str) -> [&str; 5] {
    let [go, api, admin, pipelines] = PIPELINES_PATH;
    [go, api, admin, pipelines, name]
}

impl ServerClient {
    // =============================================================================
    // Pipeline Config Management
    // =============================================================================

    /// Get a pipeline config by name
    ///
    /// # Arguments
    /// * `name` - The pipeline name
    ///
    /// # Returns
    /// The document and its version token, or `None` when the server has no
    /// pipeline by that name
    pub async fn get_pipeline_config(&self, name: &str) -> Result<Option<Versioned<PipelineConfig>>> {
        let response = self
            .request(Method::GET, &pipeline_path(name), PIPELINE_CONFIG_MEDIA_TYPE)?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Pipeline config not found: {}", name);
            return Ok(None);
        }

        let response = self.check_status(response).await?;
        self.versioned(response).await.map(Some)
    }

    /// Create a new pipeline config
    ///
    /// # Arguments
    /// * `req` - The group and pipeline to create
    ///
    /// # Returns
    /// The created document and its version token
    pub async fn create_pipeline_config(
        &self,
        req: &CreatePipelineRequest,
    ) -> Result<Versioned<PipelineConfig>> {
        let body = encode_pipeline(req)?;
        let response = self
            .request(Method::POST, &PIPELINES_PATH, PIPELINE_CONFIG_MEDIA_TYPE)?
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!(
                "pipeline group '{}'",
                req.group.as_deref().unwrap_or_default()
            )));
        }

        let response = self.check_status(response).await?;
        self.versioned(response).await
    }

    /// Replace a pipeline config
    ///
    /// # Arguments
    /// * `etag` - Version token from the last read
    /// * `config` - The full replacement document; its `name` selects the pipeline
    ///
    /// # Returns
    /// The stored document and its new version token
    pub async fn update_pipeline_config(
        &self,
        etag: &str,
        config: &PipelineConfig,
    ) -> Result<Versioned<PipelineConfig>> {
        let name = config
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ClientError::InvalidRequest("pipeline config has no name".into()))?;

        let body = encode_pipeline(config)?;
        let response = self
            .request(Method::PUT, &pipeline_path(name), PIPELINE_CONFIG_MEDIA_TYPE)?
            .header(CONTENT_TYPE, "application/json")
            .header(IF_MATCH, etag)
            .body(body)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("pipeline '{}'", name)));
        }

        let response = self.check_status(response).await?;
        self.versioned(response).await
    }

    /// Delete a pipeline config
    ///
    /// # Arguments
    /// * `name` - The pipeline name to delete
    /// * `etag` - Version token to guard the delete with, when known
    pub async fn delete_pipeline_config(&self, name: &str, etag: Option<&str>) -> Result<()> {
        let mut request =
            self.request(Method::DELETE, &pipeline_path(name), PIPELINE_CONFIG_MEDIA_TYPE)?;
        if let Some(etag) = etag {
            request = request.header(IF_MATCH, etag);
        }
        let response = request.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("pipeline '{}'", name)));
        }

        self.check_status(response).await?;
        Ok(())
    }

    /// Decode a successful response body together with its `ETag`
    async fn versioned(&self, response: reqwest::Response) -> Result<Versioned<PipelineConfig>> {
        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ClientError::ParseError("response has no ETag header".into()))?;

        let body = response.bytes().await?;
        let config = decode_pipeline(&body)?;
        Ok(Versioned::new(config, etag))
    }
}

#[async_trait]
impl PipelineConfigService for ServerClient {
    async fn get(
        &self,
        name: &str,
    ) -> std::result::Result<Option<Versioned<PipelineConfig>>, ServiceError> {
        Ok(self.get_pipeline_config(name).await?)
    }

    async fn create(
        &self,
        request: &CreatePipelineRequest,
    ) -> std::result::Result<Versioned<PipelineConfig>, ServiceError> {
        Ok(self.create_pipeline_config(request).await?)
    }

    async fn update(
        &self,
        etag: &str,
        config: &PipelineConfig,
    ) -> std::result::Result<Versioned<PipelineConfig>, ServiceError> {
        Ok(self.update_pipeline_config(etag, config).await?)
    }

    async fn delete(&self, name: &str, etag: Option<&str>) -> std::result::Result<(), ServiceError> {
        Ok(self.delete_pipeline_config(name, etag).await?)
    }
}
