use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Window and stride geometry for one buffer.
///
/// Window length follows `window_sec` and stride follows `fps`; the two are
/// independent, so consecutive frames may overlap or leave gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    pub window_len: usize,
    pub stride: usize,
    pub frame_count: usize,
}

impl FrameLayout {
    pub fn new(total_samples: usize, sample_rate: u32, config: &AnalysisConfig) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidConfig("sample rate must be positive".into()));
        }
        let sr = sample_rate as f64;
        let window_len = (sr * config.window_sec).round() as usize;
        let stride = (sr / config.fps).round() as usize;
        if window_len < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "window of {}s at {}Hz is shorter than two samples",
                config.window_sec, sample_rate
            )));
        }
        if stride == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "{} fps at {}Hz leaves no samples between frames",
                config.fps, sample_rate
            )));
        }
        let frame_count = (total_samples as f64 / sr * config.fps).floor() as usize;

        Ok(Self {
            window_len,
            stride,
            frame_count,
        })
    }

    /// Lazily yields every frame of `samples`. Calling again restarts from frame 0.
    pub fn frames<'a>(&self, samples: &'a [f32]) -> Frames<'a> {
        Frames {
            layout: *self,
            samples,
            next: 0,
        }
    }
}

/// A zero-padded copy of one analysis window.
#[derive(Clone, Debug)]
pub struct Frame {
    pub index: usize,
    pub start: usize,
    pub samples: Vec<f32>,
}

pub struct Frames<'a> {
    layout: FrameLayout,
    samples: &'a [f32],
    next: usize,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.next >= self.layout.frame_count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let start = index * self.layout.stride;
        let mut samples = vec![0.0f32; self.layout.window_len];
        if start < self.samples.len() {
            let end = (start + self.layout.window_len).min(self.samples.len());
            samples[..end - start].copy_from_slice(&self.samples[start..end]);
        }

        Some(Frame { index, start, samples })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.layout.frame_count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}
