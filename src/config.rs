use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalysisError, Result};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Tunables threaded through every stage of the pipeline.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Analysis frames per second; sets the stride between frame starts.
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Length of each analysis window in seconds.
    #[serde(default = "default_window_sec")]
    pub window_sec: f64,
    /// Labelled peaks closer than this (Hz) to a stronger one are dropped.
    #[serde(default = "default_min_hz_separation")]
    pub min_hz_separation: f64,
    #[serde(default = "default_freq_min")]
    pub freq_min: f64,
    #[serde(default = "default_freq_max")]
    pub freq_max: f64,
    /// Peaks below this fraction of the frame maximum take no part in intervals.
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,
    /// Bins below this fraction of the frame maximum are never peaks.
    #[serde(default = "default_min_rel_amp")]
    pub min_rel_amp: f64,
    /// Largest tuning error, in cents, accepted for a ratio approximation.
    #[serde(default = "default_cents_tol")]
    pub cents_tol: f64,
    #[serde(default = "default_max_den_search")]
    pub max_den_search: u32,
    #[serde(default = "default_top_notes")]
    pub top_notes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            window_sec: default_window_sec(),
            min_hz_separation: default_min_hz_separation(),
            freq_min: default_freq_min(),
            freq_max: default_freq_max(),
            min_weight: default_min_weight(),
            min_rel_amp: default_min_rel_amp(),
            cents_tol: default_cents_tol(),
            max_den_search: default_max_den_search(),
            top_notes: default_top_notes(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !(self.window_sec.is_finite() && self.window_sec > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "window_sec must be positive, got {}",
                self.window_sec
            )));
        }
        if self.max_den_search == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_den_search must be at least 1".into(),
            ));
        }
        if !(self.cents_tol.is_finite() && self.cents_tol >= 0.0)
            || !(self.min_hz_separation.is_finite() && self.min_hz_separation >= 0.0)
        {
            return Err(AnalysisError::InvalidConfig(
                "cents_tol and min_hz_separation must be finite and not negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_weight) || !(0.0..=1.0).contains(&self.min_rel_amp) {
            return Err(AnalysisError::InvalidConfig(
                "min_weight and min_rel_amp must lie in [0, 1]".into(),
            ));
        }
        if !(self.freq_min.is_finite() && self.freq_max.is_finite() && self.freq_min < self.freq_max) {
            return Err(AnalysisError::InvalidConfig(format!(
                "freq_min ({}) must be below freq_max ({})",
                self.freq_min, self.freq_max
            )));
        }
        Ok(())
    }
}

fn default_fps() -> f64 { 4.0 }
fn default_window_sec() -> f64 { 0.25 }
fn default_min_hz_separation() -> f64 { 16.0 }
fn default_freq_min() -> f64 { 10.0 }
fn default_freq_max() -> f64 { 2048.0 }
fn default_min_weight() -> f64 { 0.20 }
fn default_min_rel_amp() -> f64 { 0.05 }
fn default_cents_tol() -> f64 { 6.0 }
fn default_max_den_search() -> u32 { 32 }
fn default_top_notes() -> usize { 3 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.fps, 4.0);
        assert_eq!(cfg.window_sec, 0.25);
        assert_eq!(cfg.min_hz_separation, 16.0);
        assert_eq!((cfg.freq_min, cfg.freq_max), (10.0, 2048.0));
        assert_eq!(cfg.min_weight, 0.20);
        assert_eq!(cfg.min_rel_amp, 0.05);
        assert_eq!(cfg.cents_tol, 6.0);
        assert_eq!(cfg.max_den_search, 32);
        assert_eq!(cfg.top_notes, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: Config = toml::from_str("[analysis]\ncents_tol = 10.0\nfps = 8.0\n").unwrap();
        assert_eq!(cfg.analysis.cents_tol, 10.0);
        assert_eq!(cfg.analysis.fps, 8.0);
        assert_eq!(cfg.analysis.max_den_search, 32);
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.analysis, AnalysisConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = AnalysisConfig::default();
        cfg.fps = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.max_den_search = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.freq_min = 5000.0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.cents_tol = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.freq_min = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.min_weight = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.min_hz_separation = f64::INFINITY;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_config_missing_file_is_none() {
        assert!(load_config(Path::new("/definitely/not/here.toml")).is_none());
    }
}
