use super::note::freq_to_note;
use crate::audio::spectrum::Spectrum;
use crate::config::AnalysisConfig;

/// A spectral peak normalised against its frame's loudest bin.
#[derive(Clone, Debug, PartialEq)]
pub struct Peak {
    pub freq: f64,
    pub note: String,
    /// `magnitude / frame max`, in `[0, 1]`.
    pub weight: f64,
}

/// Local maxima at or above `min_rel_amp * max`. The first and last bin are
/// never peaks; plateaus count on every bin.
pub fn detect_peaks(spectrum: &Spectrum, config: &AnalysisConfig) -> Vec<Peak> {
    let mags = &spectrum.magnitudes;
    let max_amp = spectrum.max_magnitude();
    if mags.len() < 3 || max_amp <= 0.0 {
        return Vec::new();
    }

    let threshold = config.min_rel_amp * max_amp;
    (1..mags.len() - 1)
        .filter(|&k| mags[k] >= threshold && mags[k] >= mags[k - 1] && mags[k] >= mags[k + 1])
        .map(|k| {
            let freq = spectrum.freqs[k];
            Peak {
                freq,
                note: freq_to_note(freq),
                weight: mags[k] / max_amp,
            }
        })
        .collect()
}

/// Peaks strong enough to take part in interval scoring.
pub fn qualifying_peaks(peaks: Vec<Peak>, config: &AnalysisConfig) -> Vec<Peak> {
    peaks.into_iter().filter(|p| p.weight >= config.min_weight).collect()
}

/// Display labels: bins in descending magnitude, skipping any that sit
/// closer than `min_hz_separation` to one already chosen.
pub fn top_notes(spectrum: &Spectrum, config: &AnalysisConfig) -> Vec<Peak> {
    let max_amp = spectrum.max_magnitude();
    if max_amp <= 0.0 || config.top_notes == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..spectrum.len()).collect();
    // Stable, so equal magnitudes keep ascending bin order
    order.sort_by(|&a, &b| spectrum.magnitudes[b].total_cmp(&spectrum.magnitudes[a]));

    let mut chosen: Vec<Peak> = Vec::with_capacity(config.top_notes);
    for k in order {
        let freq = spectrum.freqs[k];
        if chosen
            .iter()
            .any(|p| (freq - p.freq).abs() < config.min_hz_separation)
        {
            continue;
        }
        chosen.push(Peak {
            freq,
            note: freq_to_note(freq),
            weight: spectrum.magnitudes[k] / max_amp,
        });
        if chosen.len() == config.top_notes {
            break;
        }
    }
    chosen
}
