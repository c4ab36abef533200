//! Render pipeline: synthesize every planned tone and write it to disk.

use crate::audio::{generate_sine_wave, save_wav};
use crate::config::Config;
use crate::sweep::ToneJob;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Statistics for a whole render run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub files_written: usize,
    pub samples_written: usize,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Log the planned paths without synthesizing or writing anything.
    pub dry_run: bool,
}

/// Render `jobs` under `config.output.base_dir`.
///
/// The first failure aborts the run; files already written are left in place.
pub fn render(jobs: &[ToneJob], config: &Config, options: RenderOptions) -> Result<RenderStats> {
    let start = Instant::now();
    let mut stats = RenderStats::default();
    let base_dir = &config.output.base_dir;

    for job in jobs {
        let path = base_dir.join(job.relative_path());

        if options.dry_run {
            info!("Would save: {} ({:.2} Hz)", path.display(), job.frequency);
            continue;
        }

        let tone = generate_sine_wave(job.frequency, &config.tone);
        save_wav(&path, &tone, config.tone.sample_rate, config.output.quantize)
            .with_context(|| format!("Failed to write tone {:.2} Hz", job.frequency))?;

        stats.files_written += 1;
        stats.samples_written += tone.len();
        info!("Saved: {}", path.display());
    }

    stats.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    debug!(
        files_written = stats.files_written,
        samples_written = stats.samples_written,
        elapsed_ms = stats.elapsed_ms,
        "Render finished"
    );
    Ok(stats)
}

/// Validate `config`, plan its sweep and render it.
pub fn run(config: &Config, options: RenderOptions) -> Result<RenderStats> {
    config.validate()?;
    let jobs = crate::sweep::plan(&config.sweep);
    let stats = render(&jobs, config, options)?;
    if options.dry_run {
        info!("Dry run: {} files planned under {}", jobs.len(), config.output.base_dir.display());
    } else {
        info!(
            "All {} tone files generated under: {}",
            stats.files_written,
            config.output.base_dir.display()
        );
    }
    Ok(stats)
}
