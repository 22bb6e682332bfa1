//! Consonance scoring for recorded audio.
//!
//! Each file is cut into windowed frames, the prominent spectral peaks of a
//! frame are paired up, and every pair is explained by the simplest integer
//! ratio within a few cents. The weighted mean of `numerator + denominator`
//! over the whole file is inverted into one score: higher means the file
//! leans on simpler, more consonant intervals.

pub mod analysis;
pub mod audio;
pub mod batch;
pub mod config;
pub mod error;
pub mod visual;

pub use audio::decode::{load_audio, AudioBuffer};
pub use analysis::score::ConsonanceScore;
pub use analysis::{analyze_buffer, analyze_file, ConsonanceReport};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
