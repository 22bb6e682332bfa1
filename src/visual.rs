use serde::Serialize;
use std::path::PathBuf;

use crate::analysis::note::UNDEFINED_NOTE;
use crate::analysis::peaks::Peak;
use crate::audio::spectrum::Spectrum;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Everything a renderer may show for one analysed frame.
pub struct FrameView<'a> {
    pub file_name: &'a str,
    pub index: usize,
    /// Frame start in seconds (`index / fps`).
    pub time: f64,
    pub spectrum: &'a Spectrum,
    pub max_amp: f64,
    /// Loudest separated bins, loudest first.
    pub top_notes: &'a [Peak],
    pub config: &'a AnalysisConfig,
}

impl FrameView<'_> {
    pub fn title(&self) -> String {
        let main_label = self.top_notes.first().map_or(UNDEFINED_NOTE, |p| p.note.as_str());
        format!("{} • t={:.1}s • note: {}", self.file_name, self.time, main_label)
    }
}

/// Per-frame side channel. Nothing it does feeds back into the score.
pub trait Visualizer {
    fn on_frame(&mut self, view: &FrameView<'_>) -> Result<()>;
}

/// Headless default.
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn on_frame(&mut self, _view: &FrameView<'_>) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    title: String,
    index: usize,
    time: f64,
    freq_range: [f64; 2],
    freqs: Vec<f64>,
    /// Magnitudes normalised to the frame maximum.
    magnitudes: Vec<f64>,
    notes: Vec<NoteLabel<'a>>,
}

#[derive(Serialize)]
struct NoteLabel<'a> {
    note: &'a str,
    freq: f64,
    /// Vertical slot used when drawing, stacked down from the top.
    y: f64,
}

/// Writes one `frame_NNNN.json` per frame into a directory.
pub struct FrameDumper {
    dir: PathBuf,
    written: usize,
}

impl FrameDumper {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl Visualizer for FrameDumper {
    fn on_frame(&mut self, view: &FrameView<'_>) -> Result<()> {
        let cfg = view.config;
        let (freqs, magnitudes): (Vec<f64>, Vec<f64>) = view
            .spectrum
            .freqs
            .iter()
            .zip(&view.spectrum.magnitudes)
            .filter(|(f, _)| (cfg.freq_min..=cfg.freq_max).contains(*f))
            .map(|(&f, &m)| (f, m / view.max_amp))
            .unzip();

        let record = FrameRecord {
            title: view.title(),
            index: view.index,
            time: view.time,
            freq_range: [cfg.freq_min, cfg.freq_max],
            freqs,
            magnitudes,
            notes: view
                .top_notes
                .iter()
                .enumerate()
                .map(|(k, p)| NoteLabel {
                    note: &p.note,
                    freq: p.freq,
                    y: 0.9 - k as f64 * 0.07,
                })
                .collect(),
        };

        let path = self.dir.join(format!("frame_{:04}.json", view.index));
        let json = serde_json::to_vec(&record).map_err(|e| AnalysisError::Visualizer(e.to_string()))?;
        std::fs::write(&path, json)
            .map_err(|e| AnalysisError::Visualizer(format!("{}: {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }
}
