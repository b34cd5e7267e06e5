//! Session recorder: drives capture feeds and finalizes the container.
//!
//! Whatever feeds were acquired at start are all released on stop, on
//! both the normal and error paths, before the session is considered
//! closed.

use chrono::Local;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::combiner::{self, MixPlan};
use super::source::CaptureSource;
use crate::pipeline::PipelineError;

/// A finalized recording artifact on disk.
#[derive(Debug, Clone)]
pub struct FinalizedRecording {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub duration_seconds: u64,
    pub plan: MixPlan,
}

pub struct SessionRecorder {
    system: Box<dyn CaptureSource>,
    mic: Box<dyn CaptureSource>,
    target_rate: u32,
    recordings_dir: PathBuf,
    capturing: bool,
}

impl SessionRecorder {
    pub fn new(
        system: Box<dyn CaptureSource>,
        mic: Box<dyn CaptureSource>,
        target_rate: u32,
        recordings_dir: PathBuf,
    ) -> Self {
        Self {
            system,
            mic,
            target_rate,
            recordings_dir,
            capturing: false,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Begin capturing. Refuses if a capture is already running.
    ///
    /// The system feed is required; the microphone is optional and
    /// degrades to system-audio-only with a warning.
    pub fn start(&mut self) -> Result<(), PipelineError> {
        if self.capturing {
            return Err(PipelineError::SessionActive);
        }

        self.system
            .start()
            .map_err(|e| PipelineError::Acquisition(e.to_string()))?;

        if let Err(e) = self.mic.start() {
            warn!(
                "Failed to start microphone: {}. Recording system audio only.",
                e
            );
        }

        self.capturing = true;
        Ok(())
    }

    /// Stop capturing and finalize the WAV artifact.
    ///
    /// Both feeds are always stopped, even when one of them errors or the
    /// finalize step fails afterwards.
    pub fn stop(&mut self) -> Result<FinalizedRecording, PipelineError> {
        if !self.capturing {
            return Err(PipelineError::NoActiveSession);
        }
        self.capturing = false;

        let system_rate = self.system.sample_rate();
        let system_samples = match self.system.stop() {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Failed to stop system audio feed: {}", e);
                Vec::new()
            }
        };

        let mic_rate = self.mic.sample_rate();
        let mic_samples = match self.mic.stop() {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Failed to stop microphone feed: {}", e);
                Vec::new()
            }
        };

        let plan = MixPlan::select(!system_samples.is_empty(), !mic_samples.is_empty())
            .ok_or(PipelineError::EmptyCapture)?;

        info!(
            "Capture stopped: system={} samples ({}Hz), mic={} samples ({}Hz), mixing {}",
            system_samples.len(),
            system_rate,
            mic_samples.len(),
            mic_rate,
            plan.describe(),
        );

        let system_resampled = combiner::resample(&system_samples, system_rate, self.target_rate);
        let mic_resampled = combiner::resample(&mic_samples, mic_rate, self.target_rate);
        let mixed = combiner::combine(plan, &system_resampled, &mic_resampled);

        let path = self.generate_recording_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_wav(&path, &mixed, self.target_rate)?;

        let duration_seconds = mixed.len() as u64 / self.target_rate.max(1) as u64;

        info!(
            "Recording finalized: {:?} ({} samples, {}s)",
            path,
            mixed.len(),
            duration_seconds
        );

        Ok(FinalizedRecording {
            path,
            sample_rate: self.target_rate,
            duration_seconds,
            plan,
        })
    }

    fn generate_recording_path(&self) -> PathBuf {
        let timestamp = Local::now().format("%Y%m%d-%H%M%S");
        let path = self.recordings_dir.join(format!("recording-{timestamp}.wav"));

        // Handle collision by appending a counter
        if path.exists() {
            for i in 1..100 {
                let alt = self
                    .recordings_dir
                    .join(format!("recording-{timestamp}-{i}.wav"));
                if !alt.exists() {
                    return alt;
                }
            }
        }

        path
    }
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), PipelineError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::source::ChannelSource;
    use tokio::sync::mpsc::UnboundedSender;

    fn recorder_with_feeds(
        dir: &Path,
    ) -> (
        SessionRecorder,
        UnboundedSender<Vec<f32>>,
        UnboundedSender<Vec<f32>>,
    ) {
        let (system, system_tx) = ChannelSource::new("system", 16000);
        let (mic, mic_tx) = ChannelSource::new("microphone", 16000);
        let recorder = SessionRecorder::new(
            Box::new(system),
            Box::new(mic),
            16000,
            dir.to_path_buf(),
        );
        (recorder, system_tx, mic_tx)
    }

    #[test]
    fn test_start_refused_while_capturing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, _sys, _mic) = recorder_with_feeds(dir.path());

        recorder.start().unwrap();
        assert!(matches!(
            recorder.start(),
            Err(PipelineError::SessionActive)
        ));
        assert!(recorder.is_capturing());
    }

    #[test]
    fn test_stop_without_start_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, _sys, _mic) = recorder_with_feeds(dir.path());

        assert!(matches!(
            recorder.stop(),
            Err(PipelineError::NoActiveSession)
        ));
    }

    #[test]
    fn test_stop_with_no_audio_is_empty_capture() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, _sys, _mic) = recorder_with_feeds(dir.path());

        recorder.start().unwrap();
        assert!(matches!(
            recorder.stop(),
            Err(PipelineError::EmptyCapture)
        ));
        // Session closed even though finalize failed.
        assert!(!recorder.is_capturing());
    }

    #[test]
    fn test_stop_finalizes_wav_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, system_tx, mic_tx) = recorder_with_feeds(dir.path());

        recorder.start().unwrap();
        system_tx.send(vec![0.1; 16000]).unwrap();
        mic_tx.send(vec![0.2; 16000]).unwrap();

        let recording = recorder.stop().unwrap();
        assert_eq!(recording.plan, MixPlan::Both);
        assert_eq!(recording.sample_rate, 16000);
        assert_eq!(recording.duration_seconds, 1);
        assert!(recording.path.exists());

        let reader = hound::WavReader::open(&recording.path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 16000);
    }

    #[test]
    fn test_system_only_when_mic_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, system_tx, _mic_tx) = recorder_with_feeds(dir.path());

        recorder.start().unwrap();
        system_tx.send(vec![0.3; 800]).unwrap();

        let recording = recorder.stop().unwrap();
        assert_eq!(recording.plan, MixPlan::SystemOnly);
    }

    #[test]
    fn test_mic_only_when_system_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, _system_tx, mic_tx) = recorder_with_feeds(dir.path());

        recorder.start().unwrap();
        mic_tx.send(vec![0.3; 800]).unwrap();

        let recording = recorder.stop().unwrap();
        assert_eq!(recording.plan, MixPlan::MicOnly);
    }

    #[test]
    fn test_restart_after_stop_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let (mut recorder, system_tx, _mic_tx) = recorder_with_feeds(dir.path());

        recorder.start().unwrap();
        system_tx.send(vec![0.1; 100]).unwrap();
        recorder.stop().unwrap();

        assert!(recorder.start().is_ok());
    }
}
