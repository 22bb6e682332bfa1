use clap::Parser;
use std::path::PathBuf;

use consonance::AnalysisConfig;

#[derive(Parser, Debug)]
#[command(name = "consonance", about = "Weighted consonance score for WAV recordings")]
pub struct Cli {
    /// Input WAV files or directories (searched recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file (defaults to consonance.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Analysis frames per second
    #[arg(long)]
    pub fps: Option<f64>,

    /// Analysis window length in seconds
    #[arg(long)]
    pub window_sec: Option<f64>,

    /// Minimum peak weight (fraction of frame max) for interval scoring
    #[arg(long)]
    pub min_weight: Option<f64>,

    /// Minimum bin amplitude (fraction of frame max) to count as a peak
    #[arg(long)]
    pub min_rel_amp: Option<f64>,

    /// Largest tuning error in cents for a ratio approximation
    #[arg(long)]
    pub cents_tol: Option<f64>,

    /// Largest denominator tried when approximating a ratio
    #[arg(long)]
    pub max_den_search: Option<u32>,

    /// Notes labelled per frame in frame dumps
    #[arg(long)]
    pub top_notes: Option<usize>,

    /// Minimum spacing (Hz) between labelled notes
    #[arg(long)]
    pub min_hz_separation: Option<f64>,

    /// Write per-frame spectrum JSON into <stem>_frames/
    #[arg(long)]
    pub dump_frames: bool,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Worker threads for multi-file runs (default: all cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl Cli {
    /// Flags given on the command line win over config-file values.
    pub fn apply_overrides(&self, cfg: &mut AnalysisConfig) {
        if let Some(v) = self.fps { cfg.fps = v; }
        if let Some(v) = self.window_sec { cfg.window_sec = v; }
        if let Some(v) = self.min_weight { cfg.min_weight = v; }
        if let Some(v) = self.min_rel_amp { cfg.min_rel_amp = v; }
        if let Some(v) = self.cents_tol { cfg.cents_tol = v; }
        if let Some(v) = self.max_den_search { cfg.max_den_search = v; }
        if let Some(v) = self.top_notes { cfg.top_notes = v; }
        if let Some(v) = self.min_hz_separation { cfg.min_hz_separation = v; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_only_given_flags() {
        let cli = Cli::parse_from(["consonance", "a.wav", "--cents-tol", "10", "--max-den-search", "16"]);
        let mut cfg = AnalysisConfig {
            fps: 8.0,
            ..AnalysisConfig::default()
        };
        cli.apply_overrides(&mut cfg);
        assert_eq!(cfg.cents_tol, 10.0);
        assert_eq!(cfg.max_den_search, 16);
        assert_eq!(cfg.fps, 8.0);
    }

    #[test]
    fn requires_an_input() {
        assert!(Cli::try_parse_from(["consonance"]).is_err());
    }
}
