// src/core/service_client.rs
//! HTTP client for the JobMatchAI analysis backend

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, trace};

use crate::environment::EnvironmentConfig;
use crate::error::AnalysisError;
use crate::file_validator::SelectedFile;
use crate::types::response::{
    AnalysisResponse, ErrorBody, HealthStatus, JobCatalog, TrainingCatalog, UploadReceipt,
};

const ANALYZE_CV_ENDPOINT: &str = "/api/analyze-cv";
const UPLOAD_CV_ENDPOINT: &str = "/api/upload-cv";
const HEALTH_ENDPOINT: &str = "/api/health";
const JOBS_ENDPOINT: &str = "/api/jobs";
const TRAININGS_ENDPOINT: &str = "/api/trainings";

/// Multipart field the backend reads the CV from
const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    port: u16,
}

impl ServiceClient {
    pub fn new(config: &EnvironmentConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            port: config.backend_port(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Port quoted in the fallback error message
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Upload the CV and get the full analysis back. One attempt, no retry.
    pub async fn analyze_cv(&self, file: &SelectedFile) -> Result<AnalysisResponse, AnalysisError> {
        self.post_file(ANALYZE_CV_ENDPOINT, file).await
    }

    /// Server-side validation echo; does not analyze anything
    pub async fn upload_cv(&self, file: &SelectedFile) -> Result<UploadReceipt, AnalysisError> {
        self.post_file(UPLOAD_CV_ENDPOINT, file).await
    }

    pub async fn health(&self) -> Result<HealthStatus, AnalysisError> {
        self.get(HEALTH_ENDPOINT).await
    }

    pub async fn list_jobs(&self) -> Result<JobCatalog, AnalysisError> {
        self.get(JOBS_ENDPOINT).await
    }

    pub async fn list_trainings(&self) -> Result<TrainingCatalog, AnalysisError> {
        self.get(TRAININGS_ENDPOINT).await
    }

    async fn post_file<R>(&self, endpoint: &str, file: &SelectedFile) -> Result<R, AnalysisError>
    where
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);

        let bytes = file
            .content()
            .read()
            .await
            .map_err(|source| AnalysisError::FileUnreadable {
                path: file.display_path(),
                source,
            })?;

        let form = Form::new().part(
            FILE_FIELD,
            Part::bytes(bytes)
                .file_name(file.name().to_string())
                .mime_str(file.media_type().as_str())
                .map_err(|e| AnalysisError::InvalidRequest(e.to_string()))?,
        );

        info!(
            "Sending {} ({} bytes) to {}",
            file.name(),
            file.size_bytes(),
            url
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("No response from {}: {}", url, e);
                AnalysisError::Transport(e.to_string())
            })?;

        Self::decode(response).await
    }

    async fn get<R>(&self, endpoint: &str) -> Result<R, AnalysisError>
    where
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("No response from {}: {}", url, e);
            AnalysisError::Transport(e.to_string())
        })?;

        Self::decode(response).await
    }

    async fn decode<R>(response: reqwest::Response) -> Result<R, AnalysisError>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        trace!("Response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        if status.is_success() {
            debug!("Backend answered {} with {} bytes", status, body.len());
            serde_json::from_str(&body).map_err(|e| {
                error!("Undecodable success body: {}", e);
                AnalysisError::malformed(e.to_string())
            })
        } else {
            let detail = extract_detail(&body);
            error!("Backend error {}: {}", status, body);
            Err(AnalysisError::Backend {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

/// `detail` from an error body: strings as is, other JSON compacted.
/// Blank strings count as no detail.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::Null => None,
        serde_json::Value::String(detail) if detail.trim().is_empty() => None,
        serde_json::Value::String(detail) => Some(detail),
        other => Some(other.to_string()),
    }
}
