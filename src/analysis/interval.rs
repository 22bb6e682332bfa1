use super::note::cents;
use super::peaks::Peak;
use crate::config::AnalysisConfig;

/// An exact, fully reduced frequency ratio `numer / denom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ratio {
    pub numer: u64,
    pub denom: u64,
}

impl Ratio {
    /// Builds `numer / denom` in lowest terms. `denom` must be non-zero.
    pub fn new(numer: u64, denom: u64) -> Self {
        debug_assert!(denom != 0);
        let g = gcd(numer, denom).max(1);
        Self {
            numer: numer / g,
            denom: denom / g,
        }
    }

    /// Numerator plus denominator; 2 for unison, 3 for an octave, 5 for a fifth.
    pub fn complexity(&self) -> u64 {
        self.numer + self.denom
    }

    pub fn value(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numer, self.denom)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// The simplest fraction within tolerance for one peak pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalMatch {
    pub ratio: Ratio,
    /// Geometric mean of the two peak weights.
    pub relevance: f64,
    /// Signed tuning error of the raw ratio against `ratio`, in cents.
    pub cents_error: f64,
}

impl IntervalMatch {
    pub fn complexity(&self) -> u64 {
        self.ratio.complexity()
    }
}

/// Smallest-denominator fraction within `cents_tol` of `raw_ratio`.
///
/// Denominators are tried in increasing order and the first that fits wins,
/// even when a larger one would fit more tightly.
pub fn approximate_ratio(raw_ratio: f64, config: &AnalysisConfig) -> Option<(Ratio, f64)> {
    if !(raw_ratio.is_finite() && raw_ratio > 0.0) {
        return None;
    }
    for d in 1..=u64::from(config.max_den_search) {
        let n = (raw_ratio * d as f64).round_ties_even() as u64;
        if n == 0 {
            continue;
        }
        let ratio = Ratio::new(n, d);
        let error = cents(raw_ratio / ratio.value());
        if error.abs() <= config.cents_tol {
            return Some((ratio, error));
        }
    }
    None
}

/// Scores one unordered peak pair. Pairs sharing a note name are skipped,
/// as are pairs no fraction fits.
pub fn match_pair(a: &Peak, b: &Peak, config: &AnalysisConfig) -> Option<IntervalMatch> {
    if a.note == b.note {
        return None;
    }
    let (high, low) = if a.freq >= b.freq { (a, b) } else { (b, a) };
    let (ratio, cents_error) = approximate_ratio(high.freq / low.freq, config)?;

    Some(IntervalMatch {
        ratio,
        relevance: (high.weight * low.weight).sqrt(),
        cents_error,
    })
}

/// Every qualifying pair in one frame, in peak order.
pub fn match_frame(peaks: &[Peak], config: &AnalysisConfig) -> Vec<IntervalMatch> {
    let mut matches = Vec::new();
    for (i, a) in peaks.iter().enumerate() {
        for b in &peaks[i + 1..] {
            if let Some(m) = match_pair(a, b, config) {
                matches.push(m);
            }
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::note::freq_to_note;

    fn peak(freq: f64, weight: f64) -> Peak {
        Peak {
            freq,
            note: freq_to_note(freq),
            weight,
        }
    }

    #[test]
    fn ratio_reduces() {
        let r = Ratio::new(6, 4);
        assert_eq!((r.numer, r.denom), (3, 2));
        assert_eq!(r.complexity(), 5);
        assert_eq!(r.to_string(), "3/2");
    }

    #[test]
    fn slightly_flat_fifth_is_three_halves() {
        let (ratio, error) = approximate_ratio(1.4998, &AnalysisConfig::default()).unwrap();
        assert_eq!(ratio, Ratio::new(3, 2));
        assert!(error.abs() < 1.0);
    }

    #[test]
    fn first_fitting_denominator_wins() {
        // 1.2 is 6/5 exactly; at an 80-cent tolerance 5/4 (d=4) fits first
        let cfg = AnalysisConfig {
            cents_tol: 80.0,
            ..AnalysisConfig::default()
        };
        let (ratio, _) = approximate_ratio(1.2, &cfg).unwrap();
        assert_eq!(ratio, Ratio::new(5, 4));

        let (ratio, _) = approximate_ratio(1.2, &AnalysisConfig::default()).unwrap();
        assert_eq!(ratio, Ratio::new(6, 5));
    }

    #[test]
    fn octave_fits_at_first_denominator() {
        let (ratio, _) = approximate_ratio(2.0, &AnalysisConfig::default()).unwrap();
        assert_eq!(ratio, Ratio::new(2, 1));
        assert_eq!(ratio.complexity(), 3);
    }

    #[test]
    fn unfit_ratio_is_discarded() {
        let cfg = AnalysisConfig {
            cents_tol: 0.01,
            max_den_search: 4,
            ..AnalysisConfig::default()
        };
        assert!(approximate_ratio(std::f64::consts::SQRT_2, &cfg).is_none());
    }

    #[test]
    fn same_note_pair_never_matches() {
        // both round to A4
        let a = peak(440.0, 1.0);
        let b = peak(444.0, 0.9);
        assert_eq!(a.note, b.note);
        assert!(match_pair(&a, &b, &AnalysisConfig::default()).is_none());
        assert!(match_frame(&[a, b], &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn pair_order_does_not_matter() {
        let lo = peak(440.0, 1.0);
        let hi = peak(660.0, 0.25);
        let cfg = AnalysisConfig::default();
        let m1 = match_pair(&lo, &hi, &cfg).unwrap();
        let m2 = match_pair(&hi, &lo, &cfg).unwrap();
        assert_eq!(m1, m2);
        assert_eq!(m1.ratio, Ratio::new(3, 2));
        assert!((m1.relevance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn frame_visits_every_distinct_pair() {
        // A4, E5, A5: 3/2, 2/1, 4/3
        let peaks = [peak(440.0, 1.0), peak(660.0, 1.0), peak(880.0, 1.0)];
        let matches = match_frame(&peaks, &AnalysisConfig::default());
        let ratios: Vec<Ratio> = matches.iter().map(|m| m.ratio).collect();
        assert_eq!(ratios, vec![Ratio::new(3, 2), Ratio::new(2, 1), Ratio::new(4, 3)]);
    }
}
