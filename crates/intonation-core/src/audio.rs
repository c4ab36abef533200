//! Tone synthesis and WAV output.
//!
//! Generates fixed-length sine tones with a linear fade-out, and writes
//! them as peak-normalized 16-bit mono PCM.

use crate::config::{Quantize, ToneConfig};
use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

/// Full-scale value a normalized peak maps to.
pub const PCM16_FULL_SCALE: f64 = 32767.0;

/// Generate `floor(sample_rate * duration)` samples of
/// `amplitude * sin(2π·freq·t)` with the last `fade_duration` seconds
/// ramped linearly down to zero.
///
/// Time points are evenly spaced over `[0, duration)`.
pub fn generate_sine_wave(freq: f64, tone: &ToneConfig) -> Vec<f64> {
    let total_samples = tone.total_samples();
    if total_samples == 0 {
        return Vec::new();
    }

    let step = tone.duration / total_samples as f64;
    let omega = 2.0 * PI * freq;
    let mut wave: Vec<f64> = (0..total_samples)
        .map(|i| tone.amplitude * (omega * (i as f64 * step)).sin())
        .collect();

    let fade_samples = tone.fade_samples().min(total_samples);
    if fade_samples > 0 {
        let start = total_samples - fade_samples;
        for (sample, gain) in wave[start..].iter_mut().zip(linear_ramp(fade_samples)) {
            *sample *= gain;
        }
    }

    wave
}

/// `n` evenly spaced points from 1.0 down to 0.0, both ends included.
/// A single point ramp is just `[1.0]`.
pub fn linear_ramp(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let step = -1.0 / (n - 1) as f64;
            let mut ramp: Vec<f64> = (0..n).map(|i| i as f64 * step + 1.0).collect();
            ramp[n - 1] = 0.0;
            ramp
        }
    }
}

/// Peak value of a signal.
pub fn peak(signal: &[f64]) -> f64 {
    signal.iter().map(|x| x.abs()).fold(0.0f64, f64::max)
}

/// Normalize so the peak maps to ±32767 and convert to 16-bit integers.
///
/// A silent or empty buffer cannot be normalized and is an error.
pub fn quantize_pcm16(samples: &[f64], mode: Quantize) -> Result<Vec<i16>> {
    let peak = peak(samples);
    if !(peak > 0.0) || !peak.is_finite() {
        anyhow::bail!("Cannot normalize buffer with peak {} ({} samples)", peak, samples.len());
    }

    Ok(samples
        .iter()
        .map(|&s| {
            let scaled = s / peak * PCM16_FULL_SCALE;
            match mode {
                Quantize::Round => scaled.round() as i16,
                Quantize::Truncate => scaled as i16,
            }
        })
        .collect())
}

/// Write audio samples to a WAV file as peak-normalized 16-bit mono PCM.
///
/// Missing parent directories are created; an existing file is overwritten.
pub fn save_wav(
    path: impl AsRef<Path>,
    samples: &[f64],
    sample_rate: u32,
    mode: Quantize,
) -> Result<()> {
    let path = path.as_ref();
    let pcm = quantize_pcm16(samples, mode)
        .with_context(|| format!("Failed to quantize {}", path.display()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &s in &pcm {
        writer.write_sample(s)?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))?;
    Ok(())
}
