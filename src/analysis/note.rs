pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Label given to frequencies that have no pitch (zero, negative, NaN).
pub const UNDEFINED_NOTE: &str = "—";

/// Nearest equal-tempered note name, e.g. `A4` for 440 Hz.
pub fn freq_to_note(freq: f64) -> String {
    if !(freq > 0.0) || !freq.is_finite() {
        return UNDEFINED_NOTE.to_string();
    }
    let semitone = (69.0 + 12.0 * (freq / 440.0).log2()).round_ties_even() as i64;
    let name = NOTE_NAMES[semitone.rem_euclid(12) as usize];
    let octave = semitone.div_euclid(12) - 1;
    format!("{name}{octave}")
}

/// Frequency ratio expressed in cents (1200 per octave).
pub fn cents(ratio: f64) -> f64 {
    1200.0 * ratio.log2()
}
