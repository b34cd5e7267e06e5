//! Stream combiner: decides how available audio feeds are merged.
//!
//! Pure functions, no state. Given which feeds actually produced audio,
//! exactly one mixing plan applies; a session with any audio at all never
//! ends up with a silent track.

/// How the captured feeds are merged into the final mono track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixPlan {
    /// Mix system audio and microphone together.
    Both,
    /// Only system audio was captured.
    SystemOnly,
    /// Only the microphone was captured.
    MicOnly,
}

impl MixPlan {
    /// Select the plan for the given feed availability.
    /// Returns None when no feed produced audio.
    pub fn select(system_present: bool, mic_present: bool) -> Option<MixPlan> {
        match (system_present, mic_present) {
            (true, true) => Some(MixPlan::Both),
            (true, false) => Some(MixPlan::SystemOnly),
            (false, true) => Some(MixPlan::MicOnly),
            (false, false) => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            MixPlan::Both => "system audio + microphone",
            MixPlan::SystemOnly => "system audio only",
            MixPlan::MicOnly => "microphone only",
        }
    }
}

/// Merge two sample buffers according to the selected plan.
///
/// Both buffers must already be at the same sample rate. Mixing averages
/// the feeds (zero-padding the shorter one) and renormalizes if the
/// result clips.
pub fn combine(plan: MixPlan, system: &[f32], mic: &[f32]) -> Vec<f32> {
    match plan {
        MixPlan::SystemOnly => system.to_vec(),
        MixPlan::MicOnly => mic.to_vec(),
        MixPlan::Both => mix_pair(system, mic),
    }
}

fn mix_pair(a: &[f32], b: &[f32]) -> Vec<f32> {
    let len = a.len().max(b.len());
    let mut mixed = Vec::with_capacity(len);

    for i in 0..len {
        let left = a.get(i).copied().unwrap_or(0.0);
        let right = b.get(i).copied().unwrap_or(0.0);
        mixed.push((left + right) / 2.0);
    }

    let peak = mixed.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak > 1.0 {
        for sample in &mut mixed {
            *sample /= peak;
        }
    }

    mixed
}

/// Resample using linear interpolation. Good enough for speech audio.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio).ceil() as usize;
    let mut resampled = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;
        let frac = src_pos - src_idx as f64;

        let sample = if src_idx + 1 < samples.len() {
            samples[src_idx] as f64 * (1.0 - frac) + samples[src_idx + 1] as f64 * frac
        } else if src_idx < samples.len() {
            samples[src_idx] as f64
        } else {
            0.0
        };

        resampled.push(sample as f32);
    }

    resampled
}
