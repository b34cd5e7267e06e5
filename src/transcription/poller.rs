//! Bounded polling loop for transcription jobs.
//!
//! Issues exactly one status query per interval, strictly in sequence,
//! and stops at the first terminal status or when the attempt budget is
//! exhausted, whichever comes first.

use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use super::{JobPhase, TranscriptionBackend, TranscriptionOutcome};
use crate::pipeline::PipelineError;
use crate::session::SessionStatusHandle;

pub struct JobPoller {
    interval: Duration,
    max_attempts: u32,
}

impl JobPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Poll until the job completes, errors, or the budget runs out.
    ///
    /// Emits a progress status before every query so the control surface
    /// can show which attempt is in flight.
    pub async fn wait_for_result(
        &self,
        backend: &dyn TranscriptionBackend,
        job_id: &str,
        status: &SessionStatusHandle,
    ) -> Result<TranscriptionOutcome, PipelineError> {
        for attempt in 1..=self.max_attempts {
            status
                .emit(format!(
                    "Transcribing... (attempt {attempt}/{})",
                    self.max_attempts
                ))
                .await;

            let job = backend.job_status(job_id).await?;

            match job.status {
                JobPhase::Completed => {
                    let text = job.text.unwrap_or_default();
                    let summary = job.summary.unwrap_or_default();
                    if summary.is_empty() {
                        warn!("Job {} completed without a summary", job_id);
                    }
                    return Ok(TranscriptionOutcome { text, summary });
                }
                JobPhase::Error => {
                    return Err(PipelineError::Transcription(
                        job.error.unwrap_or_else(|| "unknown error".to_string()),
                    ));
                }
                JobPhase::Queued | JobPhase::Processing => {
                    // No sleep after the final attempt; the budget is spent.
                    if attempt < self.max_attempts {
                        sleep(self.interval).await;
                    }
                }
            }
        }

        Err(PipelineError::Timeout {
            attempts: self.max_attempts,
        })
    }
}
