//! Transcription service client and polling.
//!
//! The remote service follows the AssemblyAI shape: upload media to get a
//! URL, submit a transcription job with summarization enabled, then poll
//! the job until it reaches a terminal status.

pub mod assembly;
pub mod poller;

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use crate::pipeline::PipelineError;

pub use assembly::AssemblyAiClient;
pub use poller::JobPoller;

/// Remote job status. A job never leaves `Completed` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Queued,
    Processing,
    Completed,
    Error,
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// One status-query response for a transcription job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    pub status: JobPhase,
    pub text: Option<String>,
    pub summary: Option<String>,
    pub error: Option<String>,
}

/// Result of a completed transcription job.
#[derive(Debug, Clone)]
pub struct TranscriptionOutcome {
    pub text: String,
    pub summary: String,
}

/// Seam over the remote transcription service.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Upload the media file; returns the remote audio URL.
    async fn upload_media(&self, path: &Path) -> Result<String, PipelineError>;

    /// Submit a transcription job for an uploaded file; returns the job id.
    /// Summarization is always requested (informative/bullets).
    async fn submit(&self, audio_url: &str) -> Result<String, PipelineError>;

    /// Query the current job status. One call per poll interval.
    async fn job_status(&self, job_id: &str) -> Result<JobStatus, PipelineError>;
}
