//! Sweep planning.
//!
//! Turns a [`SweepConfig`] into the ordered list of tones to render. Planning
//! is pure: nothing here touches the filesystem or synthesizes audio.

use crate::config::{SweepConfig, SweepMode};
use crate::notes::{cents_to_freq, midi_to_freq, note_name};
use std::path::PathBuf;
use tracing::debug;

/// Directory label for undetuned root tones in interval mode.
pub const ROOT_DIR: &str = "original";

/// One tone to synthesize and where it goes, relative to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneJob {
    pub frequency: f64,
    pub relative_dir: PathBuf,
    pub file_name: String,
}

impl ToneJob {
    pub fn relative_path(&self) -> PathBuf {
        self.relative_dir.join(&self.file_name)
    }
}

/// Plan every tone for the configured mode.
pub fn plan(sweep: &SweepConfig) -> Vec<ToneJob> {
    let jobs = match sweep.mode {
        SweepMode::Interval => interval_jobs(sweep),
        SweepMode::Flat => flat_jobs(sweep),
    };
    debug!("Planned {} tones ({:?} mode)", jobs.len(), sweep.mode);
    jobs
}

/// Interval mode: for each interval and each root that keeps the upper
/// note inside the MIDI range, one undetuned root tone followed by the
/// upper note at every detune variant.
pub fn interval_jobs(sweep: &SweepConfig) -> Vec<ToneJob> {
    let variants = sweep.resolved_detune_variants();
    let mut jobs = Vec::new();

    for interval in &sweep.intervals {
        let interval_dir = PathBuf::from(&interval.name);
        let roots = sweep.midi_range.low..sweep.midi_range.high.saturating_sub(interval.semitones);

        for root_midi in roots {
            let upper_midi = root_midi.saturating_add(interval.semitones);
            let root = note_name(root_midi);
            let upper = note_name(upper_midi);
            let upper_freq = midi_to_freq(upper_midi);

            jobs.push(ToneJob {
                frequency: midi_to_freq(root_midi),
                relative_dir: interval_dir.join(ROOT_DIR),
                file_name: format!("{}__root.wav", root),
            });

            for variant in &variants {
                jobs.push(ToneJob {
                    frequency: cents_to_freq(upper_freq, variant.cents),
                    relative_dir: interval_dir.join(&variant.name),
                    file_name: format!("{}__interval__vs_{}.wav", upper, root),
                });
            }
        }
    }

    jobs
}

/// Flat mode: every note in the MIDI range at every detune variant, named
/// by note and resolved frequency.
pub fn flat_jobs(sweep: &SweepConfig) -> Vec<ToneJob> {
    let variants = sweep.resolved_detune_variants();
    let mut jobs = Vec::new();

    for midi in sweep.midi_range.iter() {
        let base_freq = midi_to_freq(midi);
        let note = note_name(midi);

        for variant in &variants {
            let freq = cents_to_freq(base_freq, variant.cents);
            jobs.push(ToneJob {
                frequency: freq,
                relative_dir: PathBuf::from(&variant.name),
                file_name: format!("{}_{:.2}Hz.wav", note, freq),
            });
        }
    }

    jobs
}
