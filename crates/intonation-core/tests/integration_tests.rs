//! End-to-end tests: render sweeps to a scratch directory and read the WAVs back.

use hound::{SampleFormat, WavReader};
use intonation_core::audio::{generate_sine_wave, save_wav};
use intonation_core::config::{
    Config, DetuneVariant, Interval, MidiRange, Quantize, SweepMode, ToneConfig,
};
use intonation_core::notes::{cents_to_freq, midi_to_freq};
use intonation_core::render::{self, RenderOptions};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

fn read_pcm(path: &Path) -> (hound::WavSpec, Vec<i16>) {
    let reader = WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

/// Every file under `root`, keyed by relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[test]
fn test_save_wav_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested/dir/tone.wav");
    let tone = ToneConfig::default();
    let wave = generate_sine_wave(440.0, &tone);

    save_wav(&path, &wave, tone.sample_rate, Quantize::Round).unwrap();

    let (spec, samples) = read_pcm(&path);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, SampleFormat::Int);
    assert_eq!(samples.len(), 66150);

    let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
    assert_eq!(peak, 32767);
    assert_eq!(samples[0], 0);
    assert_eq!(*samples.last().unwrap(), 0);
}

#[test]
fn test_save_wav_truncate_never_exceeds_round() {
    let tmp = tempfile::tempdir().unwrap();
    let tone = ToneConfig::default();
    let wave = generate_sine_wave(261.63, &tone);

    let rounded = tmp.path().join("round.wav");
    let truncated = tmp.path().join("truncate.wav");
    save_wav(&rounded, &wave, tone.sample_rate, Quantize::Round).unwrap();
    save_wav(&truncated, &wave, tone.sample_rate, Quantize::Truncate).unwrap();

    let (_, r) = read_pcm(&rounded);
    let (_, t) = read_pcm(&truncated);
    assert_eq!(r.len(), t.len());
    for (a, b) in r.iter().zip(&t) {
        assert!((*a as i32 - *b as i32).abs() <= 1);
        assert!(b.unsigned_abs() <= a.unsigned_abs());
    }
}

#[test]
fn test_save_wav_overwrites_existing_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("tone.wav");
    fs::write(&path, b"not a wav").unwrap();

    let tone = ToneConfig {
        duration: 0.05,
        ..ToneConfig::default()
    };
    save_wav(&path, &generate_sine_wave(880.0, &tone), tone.sample_rate, Quantize::Round).unwrap();
    let (_, samples) = read_pcm(&path);
    assert_eq!(samples.len(), tone.total_samples());
}

#[test]
fn test_flat_sweep_writes_a4_original() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.base_dir = tmp.path().to_path_buf();
    config.sweep.mode = SweepMode::Flat;
    config.sweep.midi_range = MidiRange::new(69, 70);

    let stats = render::run(&config, RenderOptions::default()).unwrap();
    assert_eq!(stats.files_written, 7);

    let a4 = tmp.path().join("original").join("A4_440.00Hz.wav");
    assert!(a4.is_file());
    let (spec, samples) = read_pcm(&a4);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(samples.len(), 66150);

    for dir in ["cents_-25", "cents_-13", "cents_-5", "cents_+5", "cents_+13", "cents_+25"] {
        let entries: Vec<_> = fs::read_dir(tmp.path().join(dir)).unwrap().collect();
        assert_eq!(entries.len(), 1, "{}", dir);
    }
}

#[test]
fn test_interval_sweep_perfect_fifth() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.base_dir = tmp.path().join("sounds");
    config.sweep.midi_range = MidiRange::new(60, 68);
    config.sweep.intervals = vec![Interval::new("Perfect Fifth", 7)];
    config.tone.duration = 0.25;

    let stats = render::run(&config, RenderOptions::default()).unwrap();
    // one root (C4) plus seven detuned G4 tones
    assert_eq!(stats.files_written, 8);

    let root = tmp.path().join("sounds/Perfect Fifth/original/C4__root.wav");
    let upper = tmp.path().join("sounds/Perfect Fifth/plus_5/G4__interval__vs_C4.wav");
    assert!(root.is_file());
    assert!(upper.is_file());

    // The written tone must be the +5 cent G4, byte for byte.
    let expected_path = tmp.path().join("expected.wav");
    let freq = cents_to_freq(midi_to_freq(67), 5);
    save_wav(
        &expected_path,
        &generate_sine_wave(freq, &config.tone),
        config.tone.sample_rate,
        config.output.quantize,
    )
    .unwrap();
    assert_eq!(fs::read(&upper).unwrap(), fs::read(&expected_path).unwrap());
    assert_ne!(
        fs::read(&upper).unwrap(),
        fs::read(tmp.path().join("sounds/Perfect Fifth/in_tune/G4__interval__vs_C4.wav")).unwrap()
    );
}

#[test]
fn test_rerun_is_byte_identical() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.base_dir = tmp.path().to_path_buf();
    config.sweep.midi_range = MidiRange::new(60, 64);
    config.sweep.intervals = vec![Interval::new("Major Second", 2), Interval::new("Minor Third", 3)];
    config.sweep.detune_variants = Some(vec![
        DetuneVariant::new("flat_5", -5),
        DetuneVariant::new("in_tune", 0),
    ]);
    config.tone.duration = 0.1;

    render::run(&config, RenderOptions::default()).unwrap();
    let first = snapshot(tmp.path());
    render::run(&config, RenderOptions::default()).unwrap();
    let second = snapshot(tmp.path());

    // Major Second: 2 roots * 3 files, Minor Third: 1 root * 3 files
    assert_eq!(first.len(), 9);
    assert_eq!(first, second);
}

#[test]
fn test_invalid_config_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.output.base_dir = tmp.path().join("out");
    config.tone.sample_rate = 0;

    assert!(render::run(&config, RenderOptions::default()).is_err());
    assert!(!config.output.base_dir.exists());
}

#[test]
fn test_config_save_and_load() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("intonation.yaml");

    let mut config = Config::default();
    config.sweep.mode = SweepMode::Flat;
    config.output.quantize = Quantize::Truncate;
    config.sweep.detune_variants = Some(DetuneVariant::flat_table());
    config.save(&path).unwrap();

    assert_eq!(Config::load(&path).unwrap(), config);
    assert_eq!(Config::load_or_default(tmp.path().join("missing.yaml")).unwrap(), Config::default());

    fs::write(&path, "tone: [not, a, map]").unwrap();
    assert!(Config::load_or_default(&path).is_err());
}
