//! Error taxonomy for the recording/transcription pipeline.
//!
//! Every variant is terminal for the current session: nothing is retried,
//! the session moves to Failed and the user starts over.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("session already active")]
    SessionActive,

    #[error("no recording session in progress")]
    NoActiveSession,

    #[error("capture acquisition failed: {0}")]
    Acquisition(String),

    #[error("no audio captured during session")]
    EmptyCapture,

    #[error("artifact upload failed with status {status}: {body}")]
    Upload { status: u16, body: String },

    #[error("transcription request rejected with status {status}: {body}")]
    Request { status: u16, body: String },

    #[error("transcription failed: {0}")]
    Transcription(String),

    #[error("transcription timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("failed to finalize recording container: {0}")]
    Container(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
}
