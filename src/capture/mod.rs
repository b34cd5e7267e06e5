//! Audio capture: sources, the stream combiner, and the session recorder.

pub mod combiner;
pub mod recorder;
pub mod source;

pub use combiner::MixPlan;
pub use recorder::{FinalizedRecording, SessionRecorder};
pub use source::{CaptureSource, ChannelSource};
