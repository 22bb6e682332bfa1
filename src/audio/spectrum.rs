use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Magnitude spectrum of one frame, `window_len / 2 + 1` bins.
#[derive(Clone, Debug)]
pub struct Spectrum {
    pub freqs: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    pub fn max_magnitude(&self) -> f64 {
        self.magnitudes.iter().copied().fold(0.0f64, f64::max)
    }

    /// True when every bin is exactly zero.
    pub fn is_silent(&self) -> bool {
        self.magnitudes.iter().all(|&m| m == 0.0)
    }
}

/// Hann-windowed real-input DFT with a plan shared across frames.
pub struct SpectralAnalyzer {
    window: Vec<f64>,
    freqs: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex<f64>>,
}

impl SpectralAnalyzer {
    pub fn new(window_len: usize, sample_rate: u32) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(window_len);
        let freqs = (0..=window_len / 2)
            .map(|k| k as f64 * sample_rate as f64 / window_len as f64)
            .collect();

        Self {
            window: hann_window(window_len),
            freqs,
            fft,
            buffer: vec![Complex::new(0.0, 0.0); window_len],
        }
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Windows `frame` (which must be `window_len` long) and returns its
    /// magnitude spectrum. The frame itself is left untouched.
    pub fn analyze(&mut self, frame: &[f32]) -> Spectrum {
        debug_assert_eq!(frame.len(), self.window.len());
        for ((slot, &s), &w) in self.buffer.iter_mut().zip(frame).zip(&self.window) {
            *slot = Complex::new(s as f64 * w, 0.0);
        }
        self.fft.process(&mut self.buffer);

        let magnitudes = self.buffer[..self.freqs.len()].iter().map(|c| c.norm()).collect();

        Spectrum {
            freqs: self.freqs.clone(),
            magnitudes,
        }
    }
}

/// Symmetric Hann window, `0.5 - 0.5 cos(2 pi n / (N - 1))`.
fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / (size - 1) as f64).cos())
        .collect()
}
