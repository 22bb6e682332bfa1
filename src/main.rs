mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use cli::Cli;
use consonance::analysis::{analyze_loaded, frames_dir, ConsonanceReport};
use consonance::audio::frames::FrameLayout;
use consonance::batch;
use consonance::config::{self, AnalysisConfig};
use consonance::visual::{FrameDumper, NullVisualizer, Visualizer};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut analysis = resolve_config(cli.config.clone());
    cli.apply_overrides(&mut analysis);
    analysis.validate().context("Invalid analysis settings")?;

    let files = batch::collect_audio_files(&cli.inputs).context("Failed to scan inputs")?;
    for path in &files {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
    }
    if files.is_empty() {
        anyhow::bail!("No .wav files found under the given inputs");
    }

    if let [path] = files.as_slice() {
        let report = analyze_one(path, &analysis, cli.dump_frames)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_score(&report);
        }
        return Ok(());
    }

    println!("Found {} audio files.", files.len());
    run_batch(&cli, &files, &analysis)
}

/// Explicit `--config`, then ./consonance.toml, then the user config dirs.
fn resolve_config(explicit: Option<PathBuf>) -> AnalysisConfig {
    let config_path = explicit.or_else(|| {
        let local = PathBuf::from("consonance.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("consonance").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("consonance").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });

    match config_path {
        Some(path) => match config::load_config(&path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg.analysis
            }
            None => {
                log::warn!("Failed to load config from {}, using defaults", path.display());
                AnalysisConfig::default()
            }
        },
        None => AnalysisConfig::default(),
    }
}

fn analyze_one(path: &Path, analysis: &AnalysisConfig, dump_frames: bool) -> Result<ConsonanceReport> {
    log::info!("Input: {}", path.display());
    let audio = consonance::load_audio(path)?;

    let layout = FrameLayout::new(audio.samples.len(), audio.sample_rate, analysis)?;
    println!("Rendering {} frames …", layout.frame_count);

    let mut visualizer: Box<dyn Visualizer> = if dump_frames {
        Box::new(FrameDumper::new(frames_dir(path)))
    } else {
        Box::new(NullVisualizer)
    };
    let report = analyze_loaded(path, &audio, analysis, visualizer.as_mut())
        .with_context(|| format!("Failed to analyse {}", path.display()))?;
    Ok(report)
}

fn print_score(report: &ConsonanceReport) {
    match report.score.value() {
        Some(score) => println!(
            "Weighted consonance score for {} (1 / avg(numerator+denominator), weight-weighted): {:.4}",
            report.file_stem, score
        ),
        None => println!("No intervals passed the filters; no consonance score computed."),
    }
}

fn run_batch(cli: &Cli, files: &[PathBuf], analysis: &AnalysisConfig) -> Result<()> {
    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(jobs) = cli.jobs {
            builder = builder.num_threads(jobs);
        }
        builder.build().context("Failed to build worker pool")?
    };

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );

    let results = pool.install(|| {
        batch::analyze_all(files, analysis, cli.dump_frames, |_| pb.inc(1))
    });
    pb.finish_with_message("Analysis complete");

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => failures.push((path, e)),
        }
    }
    batch::rank(&mut reports);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("\nFiles ranked (most to least consonant):");
        for (pos, report) in reports.iter().enumerate() {
            let name = report
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!("{:>2}. {:<50}  score={}", pos + 1, name, report.score);
        }
    }

    for (path, err) in &failures {
        eprintln!("failed: {}: {}", path.display(), err);
    }
    if reports.is_empty() {
        anyhow::bail!("All {} files failed to analyse", failures.len());
    }
    Ok(())
}
