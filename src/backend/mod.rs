//! Backend artifact store.
//!
//! Uploads the finalized recording (multipart, with a title) and the
//! transcript/summary text artifacts keyed by the server-assigned
//! meeting id. Single attempt per upload; a non-success response is
//! surfaced as a pipeline error, never retried.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::pipeline::PipelineError;

/// Server-assigned identifier for a stored meeting recording.
/// Required by the transcript/summary uploads that follow.
#[derive(Debug, Clone)]
pub struct MeetingRef {
    pub id: String,
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload the recording; returns the meeting id assigned by the server.
    async fn upload_recording(
        &self,
        path: &Path,
        title: &str,
    ) -> Result<MeetingRef, PipelineError>;

    /// Attach the transcript text to a stored meeting.
    async fn upload_transcript(
        &self,
        meeting: &MeetingRef,
        text: &str,
    ) -> Result<(), PipelineError>;

    /// Attach the summary text to a stored meeting.
    async fn upload_summary(&self, meeting: &MeetingRef, text: &str)
        -> Result<(), PipelineError>;
}

#[derive(Debug, Deserialize)]
struct RecordingUploadResponse {
    id: String,
}

/// Reqwest-backed store for the meeting backend.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn upload_text_artifact(
        &self,
        url: String,
        field: &'static str,
        filename: String,
        text: &str,
    ) -> Result<(), PipelineError> {
        let form = reqwest::multipart::Form::new().part(
            field,
            reqwest::multipart::Part::text(text.to_string())
                .file_name(filename)
                .mime_str("text/plain")?,
        );

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Upload {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for BackendClient {
    async fn upload_recording(
        &self,
        path: &Path,
        title: &str,
    ) -> Result<MeetingRef, PipelineError> {
        let url = format!("{}/recordings", self.base_url);
        debug!("Uploading recording {:?} to {}", path, url);

        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording.wav")
            .to_string();

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data)
                    .file_name(filename)
                    .mime_str("audio/wav")?,
            )
            .text("title", title.to_string());

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(PipelineError::Upload {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RecordingUploadResponse =
            serde_json::from_str(&body).map_err(|e| PipelineError::Upload {
                status: status.as_u16(),
                body: format!("unparseable upload response: {e}"),
            })?;

        info!("Recording stored as meeting {}", parsed.id);
        Ok(MeetingRef { id: parsed.id })
    }

    async fn upload_transcript(
        &self,
        meeting: &MeetingRef,
        text: &str,
    ) -> Result<(), PipelineError> {
        let url = format!("{}/recordings/{}/transcript", self.base_url, meeting.id);
        self.upload_text_artifact(url, "transcript", format!("transcript-{}.txt", meeting.id), text)
            .await
    }

    async fn upload_summary(
        &self,
        meeting: &MeetingRef,
        text: &str,
    ) -> Result<(), PipelineError> {
        let url = format!("{}/recordings/{}/summary", self.base_url, meeting.id);
        self.upload_text_artifact(url, "summary", format!("summary-{}.txt", meeting.id), text)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BackendClient::new("http://localhost:3000/", None);
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_upload_response_parsing() {
        let parsed: RecordingUploadResponse =
            serde_json::from_str(r#"{"id": "mtg-42", "title": "Standup"}"#).unwrap();
        assert_eq!(parsed.id, "mtg-42");
    }
}
