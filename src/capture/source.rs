//! Capture source abstraction.
//!
//! Platform capture glue (display audio loopback, microphone devices,
//! browser tab capture helpers) lives outside this crate and delivers
//! sample blocks through a [`ChannelSource`]. The pipeline only ever sees
//! the [`CaptureSource`] trait.

use anyhow::{bail, Result};
use tokio::sync::mpsc;

/// A single audio capture feed.
///
/// Feeds capture independently and hand back everything they collected
/// when stopped. Sample rates may differ between feeds; the combiner
/// resamples before mixing.
pub trait CaptureSource: Send {
    /// Begin collecting samples.
    fn start(&mut self) -> Result<()>;

    /// Stop collecting and return all captured samples, releasing any
    /// resources held by the feed.
    fn stop(&mut self) -> Result<Vec<f32>>;

    /// Whether this feed is currently collecting.
    fn is_active(&self) -> bool;

    /// Sample rate of the captured audio.
    fn sample_rate(&self) -> u32;
}

/// Capture source fed over a channel by external capture glue.
///
/// Blocks pushed while the source is inactive are discarded on the next
/// start, so a stale helper cannot leak audio into a new session.
pub struct ChannelSource {
    label: &'static str,
    sample_rate: u32,
    rx: mpsc::UnboundedReceiver<Vec<f32>>,
    active: bool,
}

impl ChannelSource {
    /// Create a source and the sender half used by the capture glue.
    pub fn new(
        label: &'static str,
        sample_rate: u32,
    ) -> (Self, mpsc::UnboundedSender<Vec<f32>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                label,
                sample_rate,
                rx,
                active: false,
            },
            tx,
        )
    }

    fn drain(&mut self) -> Vec<Vec<f32>> {
        let mut chunks = Vec::new();
        while let Ok(block) = self.rx.try_recv() {
            if !block.is_empty() {
                chunks.push(block);
            }
        }
        chunks
    }
}

impl CaptureSource for ChannelSource {
    fn start(&mut self) -> Result<()> {
        if self.active {
            bail!("{} capture already started", self.label);
        }
        // Discard anything queued before this session began.
        self.drain();
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<f32>> {
        if !self.active {
            return Ok(Vec::new());
        }
        self.active = false;

        let chunks = self.drain();
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        let mut samples = Vec::with_capacity(total);
        for chunk in chunks {
            samples.extend_from_slice(&chunk);
        }
        Ok(samples)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_blocks_in_order() {
        let (mut source, tx) = ChannelSource::new("system", 48000);
        source.start().unwrap();

        tx.send(vec![0.1, 0.2]).unwrap();
        tx.send(vec![0.3]).unwrap();

        let samples = source.stop().unwrap();
        assert_eq!(samples, vec![0.1, 0.2, 0.3]);
        assert!(!source.is_active());
    }

    #[test]
    fn test_start_discards_stale_blocks() {
        let (mut source, tx) = ChannelSource::new("microphone", 48000);
        tx.send(vec![9.0, 9.0]).unwrap();

        source.start().unwrap();
        tx.send(vec![0.5]).unwrap();

        assert_eq!(source.stop().unwrap(), vec![0.5]);
    }

    #[test]
    fn test_double_start_rejected() {
        let (mut source, _tx) = ChannelSource::new("system", 48000);
        source.start().unwrap();
        assert!(source.start().is_err());
    }

    #[test]
    fn test_stop_without_start_is_empty() {
        let (mut source, tx) = ChannelSource::new("system", 48000);
        tx.send(vec![1.0]).unwrap();
        assert!(source.stop().unwrap().is_empty());
    }

    #[test]
    fn test_stop_after_sender_dropped() {
        let (mut source, tx) = ChannelSource::new("system", 16000);
        source.start().unwrap();
        tx.send(vec![0.25]).unwrap();
        drop(tx);

        assert_eq!(source.stop().unwrap(), vec![0.25]);
    }
}
