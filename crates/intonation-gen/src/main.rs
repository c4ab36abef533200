//! Intonation tone generator.
//!
//! Batch-renders sine tones for interval intonation practice:
//! - `--mode interval` → `<out>/<interval>/<variant>/<note>__interval__vs_<root>.wav`
//! - `--mode flat`     → `<out>/<variant>/<note>_<freq>Hz.wav`

use anyhow::Result;
use clap::{Parser, ValueEnum};
use intonation_core::{
    config::{Config, MidiRange, Quantize, SweepMode},
    notes::parse_midi,
    render::{self, RenderOptions},
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "intonation-gen", about = "Generate sine tones for intonation training")]
struct Args {
    /// Path to a YAML config; defaults are used if it does not exist
    #[arg(short, long, default_value = "intonation.yaml")]
    config: PathBuf,

    /// Override sweep mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Override output root directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Override 16-bit quantization
    #[arg(long, value_enum)]
    quantize: Option<QuantizeArg>,

    /// Lowest MIDI note, as a number or name (e.g. 55 or G3)
    #[arg(long, value_parser = parse_midi)]
    low: Option<i32>,

    /// MIDI note one past the highest, as a number or name (e.g. 84 or C6)
    #[arg(long, value_parser = parse_midi)]
    high: Option<i32>,

    /// Log planned files without writing them
    #[arg(long)]
    dry_run: bool,

    /// Save the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Interval,
    Flat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QuantizeArg {
    Round,
    Truncate,
}

impl From<ModeArg> for SweepMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Interval => SweepMode::Interval,
            ModeArg::Flat => SweepMode::Flat,
        }
    }
}

impl From<QuantizeArg> for Quantize {
    fn from(q: QuantizeArg) -> Self {
        match q {
            QuantizeArg::Round => Quantize::Round,
            QuantizeArg::Truncate => Quantize::Truncate,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    info!("Intonation tone generator v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_or_default(&args.config)?;
    apply_overrides(&mut config, &args);

    if let Some(path) = &args.write_config {
        config.validate()?;
        config.save(path)?;
        info!("Config written to {}", path.display());
        return Ok(());
    }

    render::run(
        &config,
        RenderOptions {
            dry_run: args.dry_run,
        },
    )?;
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(mode) = args.mode {
        config.sweep.mode = mode.into();
    }
    if let Some(out) = &args.out {
        config.output.base_dir = out.clone();
    }
    if let Some(quantize) = args.quantize {
        config.output.quantize = quantize.into();
    }
    let MidiRange { low, high } = config.sweep.midi_range;
    config.sweep.midi_range = MidiRange::new(args.low.unwrap_or(low), args.high.unwrap_or(high));
}
