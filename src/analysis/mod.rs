pub mod interval;
pub mod note;
pub mod peaks;
pub mod score;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::audio::decode::{load_audio, AudioBuffer};
use crate::audio::frames::FrameLayout;
use crate::audio::spectrum::SpectralAnalyzer;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::visual::{FrameView, Visualizer};

use interval::match_frame;
use peaks::{detect_peaks, qualifying_peaks, top_notes};
use score::{ConsonanceAccumulator, ConsonanceScore};

/// Outcome of analysing one sample buffer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BufferAnalysis {
    pub frame_count: usize,
    /// Frames that were not all-zero after windowing.
    pub frames_analyzed: usize,
    pub pairs_scored: usize,
    pub accumulator: ConsonanceAccumulator,
    pub score: ConsonanceScore,
}

/// Per-file result handed back to callers.
#[derive(Clone, Debug, Serialize)]
pub struct ConsonanceReport {
    pub path: PathBuf,
    pub file_stem: String,
    pub sample_rate: u32,
    pub duration: f64,
    pub frame_count: usize,
    pub frames_analyzed: usize,
    pub pairs_scored: usize,
    pub total_weighted_complexity: f64,
    pub total_weight: f64,
    pub score: ConsonanceScore,
}

/// `<dir>/<stem>_frames` next to the input file.
pub fn frames_dir(path: &Path) -> PathBuf {
    let stem = file_stem(path);
    path.with_file_name(format!("{stem}_frames"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Runs framing, spectral analysis, peak picking and interval scoring over
/// `audio`, strictly in frame order.
pub fn analyze_buffer(
    audio: &AudioBuffer,
    config: &AnalysisConfig,
    label: &str,
    visualizer: &mut dyn Visualizer,
) -> Result<BufferAnalysis> {
    config.validate()?;
    let layout = FrameLayout::new(audio.samples.len(), audio.sample_rate, config)?;
    log::info!(
        "Frame layout: window={} stride={} frames={}",
        layout.window_len,
        layout.stride,
        layout.frame_count
    );

    let mut analyzer = SpectralAnalyzer::new(layout.window_len, audio.sample_rate);
    let mut accumulator = ConsonanceAccumulator::default();
    let mut frames_analyzed = 0;
    let mut pairs_scored = 0;

    for frame in layout.frames(&audio.samples) {
        let spectrum = analyzer.analyze(&frame.samples);
        if spectrum.is_silent() {
            log::debug!("frame {}: silent, skipped", frame.index);
            continue;
        }
        frames_analyzed += 1;
        let max_amp = spectrum.max_magnitude();

        let peaks = qualifying_peaks(detect_peaks(&spectrum, config), config);
        if peaks.len() >= 2 {
            let matches = match_frame(&peaks, config);
            log::debug!(
                "frame {}: {} peaks, {} scored pairs",
                frame.index,
                peaks.len(),
                matches.len()
            );
            pairs_scored += matches.len();
            accumulator.add_frame(&matches);
        }

        let labels = top_notes(&spectrum, config);
        let view = FrameView {
            file_name: label,
            index: frame.index,
            time: frame.index as f64 / config.fps,
            spectrum: &spectrum,
            max_amp,
            top_notes: &labels,
            config,
        };
        if let Err(e) = visualizer.on_frame(&view) {
            log::warn!("frame {}: {}", frame.index, e);
        }
    }

    let score = accumulator.score();
    if !score.is_defined() {
        log::warn!("{}: no intervals passed the filters; score undefined", label);
    }

    Ok(BufferAnalysis {
        frame_count: layout.frame_count,
        frames_analyzed,
        pairs_scored,
        accumulator,
        score,
    })
}

/// Loads `path`, creates its `<stem>_frames` sibling directory and scores it.
pub fn analyze_file(
    path: &Path,
    config: &AnalysisConfig,
    visualizer: &mut dyn Visualizer,
) -> Result<ConsonanceReport> {
    let audio = load_audio(path)?;
    analyze_loaded(path, &audio, config, visualizer)
}

/// As [`analyze_file`], for a buffer the caller already decoded from `path`.
pub fn analyze_loaded(
    path: &Path,
    audio: &AudioBuffer,
    config: &AnalysisConfig,
    visualizer: &mut dyn Visualizer,
) -> Result<ConsonanceReport> {
    let outdir = frames_dir(path);
    std::fs::create_dir_all(&outdir).map_err(|source| AnalysisError::FramesDir {
        path: outdir.clone(),
        source,
    })?;

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let analysis = analyze_buffer(audio, config, &name, visualizer)?;

    Ok(ConsonanceReport {
        path: path.to_path_buf(),
        file_stem: file_stem(path),
        sample_rate: audio.sample_rate,
        duration: audio.duration(),
        frame_count: analysis.frame_count,
        frames_analyzed: analysis.frames_analyzed,
        pairs_scored: analysis.pairs_scored,
        total_weighted_complexity: analysis.accumulator.total_weighted_complexity,
        total_weight: analysis.accumulator.total_weight,
        score: analysis.score,
    })
}
