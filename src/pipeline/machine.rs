//! Session lifecycle orchestrator.
//!
//! Drives the full pipeline:
//! capture → finalize → upload recording → submit transcription →
//! poll to completion → upload transcript + summary.
//!
//! Steps are strictly sequential and run inline on the service loop, so
//! no new session can begin while a pipeline (including an in-flight
//! poll) is still running. All collaborators are injected via the
//! constructor.

use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::backend::{ArtifactStore, MeetingRef};
use crate::capture::{FinalizedRecording, SessionRecorder};
use crate::session::{SessionState, SessionStatusHandle};
use crate::transcription::{JobPoller, TranscriptionBackend, TranscriptionOutcome};

use super::PipelineError;

/// Options accepted when starting a session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartOptions {
    pub title: Option<String>,
}

/// Result returned from starting a session.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub session_id: Uuid,
}

/// Result returned from stopping a session.
#[derive(Debug, Clone)]
pub struct StopOutcome {
    pub session_id: Option<Uuid>,
    pub duration_seconds: u64,
    pub meeting_id: String,
}

pub struct SessionMachine {
    recorder: SessionRecorder,
    store: Box<dyn ArtifactStore>,
    transcriber: Box<dyn TranscriptionBackend>,
    poller: JobPoller,
    status: SessionStatusHandle,
}

impl SessionMachine {
    pub fn new(
        recorder: SessionRecorder,
        store: Box<dyn ArtifactStore>,
        transcriber: Box<dyn TranscriptionBackend>,
        poller: JobPoller,
        status: SessionStatusHandle,
    ) -> Self {
        Self {
            recorder,
            store,
            transcriber,
            poller,
            status,
        }
    }

    /// Start a capture session.
    ///
    /// Rejected while a session is active; the rejection leaves the
    /// existing session untouched.
    pub async fn start(&mut self, options: StartOptions) -> Result<StartOutcome, PipelineError> {
        let current = self.status.get().await;
        if current.state == SessionState::Capturing {
            return Err(PipelineError::SessionActive);
        }

        self.recorder.start()?;

        let session_id = Uuid::new_v4();
        self.status.begin(session_id, options.title).await;

        Ok(StartOutcome { session_id })
    }

    /// Stop capturing and run the pipeline to completion.
    ///
    /// The title may be supplied here (the UI asks for it at stop time);
    /// it falls back to the title given at start, then to a placeholder.
    pub async fn stop(&mut self, title: Option<String>) -> Result<StopOutcome, PipelineError> {
        let current = self.status.get().await;
        if current.state != SessionState::Capturing {
            return Err(PipelineError::NoActiveSession);
        }

        self.status.set_title(title).await;
        self.status
            .transition(SessionState::Finalizing, "Finalizing recording...")
            .await;

        let recording = match self.recorder.stop() {
            Ok(recording) => recording,
            Err(e) => {
                error!("Failed to finalize recording: {}", e);
                self.status.fail(e.to_string()).await;
                return Err(e);
            }
        };

        let session = self.status.get().await;
        let title = session
            .title
            .clone()
            .unwrap_or_else(|| "Untitled meeting".to_string());

        match self.process(&recording, &title).await {
            Ok(meeting_id) => {
                self.status
                    .complete("Transcription completed and uploaded")
                    .await;
                info!(
                    "Session {:?} done: meeting {} ({}s of audio)",
                    session.session_id, meeting_id, recording.duration_seconds
                );
                Ok(StopOutcome {
                    session_id: session.session_id,
                    duration_seconds: recording.duration_seconds,
                    meeting_id,
                })
            }
            Err(e) => {
                error!("Pipeline failed: {}", e);
                self.status.fail(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// upload → submit → poll → finalize, each step gated on its
    /// predecessor's result. Single attempt per step.
    async fn process(
        &self,
        recording: &FinalizedRecording,
        title: &str,
    ) -> Result<String, PipelineError> {
        self.status
            .transition(SessionState::Uploading, "Uploading recording...")
            .await;
        let meeting = self.store.upload_recording(&recording.path, title).await?;

        self.status
            .transition(
                SessionState::Transcribing,
                "Uploading recording for transcription...",
            )
            .await;
        let audio_url = self.transcriber.upload_media(&recording.path).await?;

        self.status.emit("Starting transcription process...").await;
        let job_id = self.transcriber.submit(&audio_url).await?;

        let outcome = self
            .poller
            .wait_for_result(self.transcriber.as_ref(), &job_id, &self.status)
            .await?;

        self.finalize(&meeting, &outcome).await?;
        Ok(meeting.id)
    }

    /// Upload transcript and summary as independent artifacts.
    ///
    /// One failing does not prevent the other attempt, but either failure
    /// fails the session; the status names the step that broke.
    async fn finalize(
        &self,
        meeting: &MeetingRef,
        outcome: &TranscriptionOutcome,
    ) -> Result<(), PipelineError> {
        self.status
            .emit("Uploading transcript and summary...")
            .await;

        let transcript_result = self.store.upload_transcript(meeting, &outcome.text).await;
        if let Err(e) = &transcript_result {
            error!("Transcript upload failed: {}", e);
            self.status.emit("Transcript upload failed").await;
        }

        let summary_result = self.store.upload_summary(meeting, &outcome.summary).await;
        if let Err(e) = &summary_result {
            error!("Summary upload failed: {}", e);
            self.status.emit("Summary upload failed").await;
        }

        transcript_result?;
        summary_result?;
        Ok(())
    }

    pub fn status_handle(&self) -> SessionStatusHandle {
        self.status.clone()
    }
}
