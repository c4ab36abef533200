use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main configuration for a tone generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tone: ToneConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory every generated file is placed under.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default)]
    pub quantize: Quantize,
}

/// Synthesis parameters shared by every tone of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Peak amplitude before the fade-out is applied.
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    /// Seconds of linear fade-out at the end of each tone.
    #[serde(default = "default_fade_duration")]
    pub fade_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub mode: SweepMode,
    #[serde(default)]
    pub midi_range: MidiRange,
    /// Explicit detune table. When absent the mode's stock table is used,
    /// see [`SweepConfig::resolved_detune_variants`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detune_variants: Option<Vec<DetuneVariant>>,
    #[serde(default = "default_intervals")]
    pub intervals: Vec<Interval>,
}

/// Shape of the parameter sweep and of the resulting directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    /// `<interval>/<variant>/<note>__interval__vs_<root>.wav` plus root tones.
    #[default]
    Interval,
    /// `<variant>/<note>_<freq>Hz.wav` over the whole MIDI range.
    Flat,
}

/// How normalized samples are converted to 16-bit integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantize {
    /// Round to nearest.
    #[default]
    Round,
    /// Truncate toward zero. Byte-identical with the legacy generator output.
    Truncate,
}

/// Half-open MIDI note range `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiRange {
    #[serde(default = "default_midi_low")]
    pub low: i32,
    #[serde(default = "default_midi_high")]
    pub high: i32,
}

/// A labeled cents offset. The label names the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetuneVariant {
    pub name: String,
    pub cents: i32,
}

/// A named musical interval measured in semitones above the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub name: String,
    pub semitones: i32,
}

impl DetuneVariant {
    pub fn new(name: impl Into<String>, cents: i32) -> Self {
        Self {
            name: name.into(),
            cents,
        }
    }

    /// Stock table for [`SweepMode::Interval`].
    pub fn interval_table() -> Vec<Self> {
        vec![
            Self::new("flat_25", -25),
            Self::new("flat_13", -13),
            Self::new("flat_5", -5),
            Self::new("in_tune", 0),
            Self::new("plus_5", 5),
            Self::new("plus_13", 13),
            Self::new("plus_25", 25),
        ]
    }

    /// Stock table for [`SweepMode::Flat`].
    pub fn flat_table() -> Vec<Self> {
        vec![
            Self::new("cents_-25", -25),
            Self::new("cents_-13", -13),
            Self::new("cents_-5", -5),
            Self::new("original", 0),
            Self::new("cents_+5", 5),
            Self::new("cents_+13", 13),
            Self::new("cents_+25", 25),
        ]
    }
}

impl Interval {
    pub fn new(name: impl Into<String>, semitones: i32) -> Self {
        Self {
            name: name.into(),
            semitones,
        }
    }
}

impl MidiRange {
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    pub fn is_empty(&self) -> bool {
        self.low >= self.high
    }

    pub fn iter(&self) -> std::ops::Range<i32> {
        self.low..self.high
    }
}

/// Lowest and highest valid MIDI note numbers.
pub const MIDI_MIN: i32 = 0;
pub const MIDI_MAX: i32 = 127;

// Default value functions
fn default_base_dir() -> PathBuf {
    PathBuf::from("sounds")
}
fn default_sample_rate() -> u32 {
    44100
}
fn default_duration() -> f64 {
    1.5
}
fn default_amplitude() -> f64 {
    0.5
}
fn default_fade_duration() -> f64 {
    0.01
}
// G3
fn default_midi_low() -> i32 {
    55
}
// One past B5
fn default_midi_high() -> i32 {
    84
}
fn default_intervals() -> Vec<Interval> {
    vec![
        Interval::new("Major Second", 2),
        Interval::new("Minor Third", 3),
        Interval::new("Major Third", 4),
        Interval::new("Perfect Fourth", 5),
        Interval::new("Perfect Fifth", 7),
        Interval::new("Major Sixth", 9),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            tone: ToneConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            quantize: Quantize::default(),
        }
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            duration: default_duration(),
            amplitude: default_amplitude(),
            fade_duration: default_fade_duration(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            mode: SweepMode::default(),
            midi_range: MidiRange::default(),
            detune_variants: None,
            intervals: default_intervals(),
        }
    }
}

impl Default for MidiRange {
    fn default() -> Self {
        Self {
            low: default_midi_low(),
            high: default_midi_high(),
        }
    }
}

impl ToneConfig {
    /// `floor(sample_rate * duration)`.
    pub fn total_samples(&self) -> usize {
        (self.sample_rate as f64 * self.duration) as usize
    }

    /// `floor(fade_duration * sample_rate)`.
    pub fn fade_samples(&self) -> usize {
        (self.fade_duration * self.sample_rate as f64) as usize
    }
}

impl SweepConfig {
    pub fn resolved_detune_variants(&self) -> Vec<DetuneVariant> {
        match (&self.detune_variants, self.mode) {
            (Some(variants), _) => variants.clone(),
            (None, SweepMode::Interval) => DetuneVariant::interval_table(),
            (None, SweepMode::Flat) => DetuneVariant::flat_table(),
        }
    }
}

impl Config {
    /// Load config from a YAML file, falling back to defaults for missing fields.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        Ok(config)
    }

    /// Load config if the file exists, otherwise return defaults.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Reject parameters that would produce meaningless audio or clashing paths.
    pub fn validate(&self) -> Result<()> {
        let tone = &self.tone;
        if tone.sample_rate == 0 {
            anyhow::bail!("sample_rate must be positive");
        }
        if !tone.duration.is_finite() || tone.duration <= 0.0 {
            anyhow::bail!("duration must be a positive number of seconds, got {}", tone.duration);
        }
        if !tone.amplitude.is_finite() {
            anyhow::bail!("amplitude must be finite, got {}", tone.amplitude);
        }
        if !tone.fade_duration.is_finite() || tone.fade_duration < 0.0 {
            anyhow::bail!("fade_duration must be non-negative, got {}", tone.fade_duration);
        }
        if tone.total_samples() == 0 {
            anyhow::bail!("duration {}s yields no samples at {} Hz", tone.duration, tone.sample_rate);
        }

        let sweep = &self.sweep;
        if sweep.midi_range.low < MIDI_MIN || sweep.midi_range.high > MIDI_MAX + 1 {
            anyhow::bail!(
                "MIDI range [{}, {}) must lie within [{}, {}]",
                sweep.midi_range.low,
                sweep.midi_range.high,
                MIDI_MIN,
                MIDI_MAX + 1
            );
        }
        if sweep.midi_range.is_empty() {
            anyhow::bail!(
                "MIDI range [{}, {}) is empty",
                sweep.midi_range.low,
                sweep.midi_range.high
            );
        }

        let variants = sweep.resolved_detune_variants();
        if variants.is_empty() {
            anyhow::bail!("At least one detune variant is required");
        }
        let mut seen = HashSet::new();
        for variant in &variants {
            check_path_component("detune variant", &variant.name)?;
            if !seen.insert(variant.name.as_str()) {
                anyhow::bail!("Duplicate detune variant name: {:?}", variant.name);
            }
        }

        if sweep.mode == SweepMode::Interval {
            if sweep.intervals.is_empty() {
                anyhow::bail!("Interval mode needs at least one interval");
            }
            let mut seen = HashSet::new();
            for interval in &sweep.intervals {
                check_path_component("interval", &interval.name)?;
                if !(0..=MIDI_MAX).contains(&interval.semitones) {
                    anyhow::bail!(
                        "Interval {:?} spans {} semitones, expected 0..={}",
                        interval.name,
                        interval.semitones,
                        MIDI_MAX
                    );
                }
                if !seen.insert(interval.name.as_str()) {
                    anyhow::bail!("Duplicate interval name: {:?}", interval.name);
                }
            }
        }

        Ok(())
    }
}

fn check_path_component(kind: &str, name: &str) -> Result<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0')
    {
        anyhow::bail!("Invalid {} name {:?}: must be a single path component", kind, name);
    }
    Ok(())
}
