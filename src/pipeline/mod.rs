//! Upload/transcription pipeline: the session orchestrator and its
//! error taxonomy.

pub mod error;
pub mod machine;

pub use error::PipelineError;
pub use machine::{SessionMachine, StartOptions, StartOutcome, StopOutcome};
