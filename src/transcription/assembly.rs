//! AssemblyAI API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use super::{JobStatus, TranscriptionBackend};
use crate::pipeline::PipelineError;

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest {
    audio_url: String,
    summarization: bool,
    summary_model: &'static str,
    summary_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranscriptSubmitResponse {
    id: String,
}

pub struct AssemblyAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AssemblyAiClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn read_success_body(
        response: reqwest::Response,
    ) -> Result<String, PipelineError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(PipelineError::Request {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl TranscriptionBackend for AssemblyAiClient {
    async fn upload_media(&self, path: &Path) -> Result<String, PipelineError> {
        let url = format!("{}/upload", self.base_url);
        debug!("Uploading media {:?} to AssemblyAI", path);

        let data = tokio::fs::read(path).await?;
        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(data)
            .send()
            .await?;

        let body = Self::read_success_body(response).await?;
        let parsed: MediaUploadResponse =
            serde_json::from_str(&body).map_err(|e| PipelineError::Request {
                status: 200,
                body: format!("unparseable upload response: {e}"),
            })?;

        debug!("Media uploaded: {}", parsed.upload_url);
        Ok(parsed.upload_url)
    }

    async fn submit(&self, audio_url: &str) -> Result<String, PipelineError> {
        let url = format!("{}/transcript", self.base_url);

        let request = TranscriptRequest {
            audio_url: audio_url.to_string(),
            summarization: true,
            summary_model: "informative",
            summary_type: "bullets",
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = Self::read_success_body(response).await?;
        let parsed: TranscriptSubmitResponse =
            serde_json::from_str(&body).map_err(|e| PipelineError::Request {
                status: 200,
                body: format!("unparseable submit response: {e}"),
            })?;

        info!("Transcription job submitted: {}", parsed.id);
        Ok(parsed.id)
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatus, PipelineError> {
        let url = format!("{}/transcript/{}", self.base_url, job_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await?;

        let body = Self::read_success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| PipelineError::Request {
            status: 200,
            body: format!("unparseable status response: {e}"),
        })
    }
}
