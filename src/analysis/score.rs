use serde::Serialize;

use super::interval::IntervalMatch;

/// Running sums over every scored pair of one file. Both only grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ConsonanceAccumulator {
    pub total_weighted_complexity: f64,
    pub total_weight: f64,
}

impl ConsonanceAccumulator {
    pub fn add(&mut self, m: &IntervalMatch) {
        self.total_weighted_complexity += m.relevance * m.complexity() as f64;
        self.total_weight += m.relevance;
    }

    /// Folds in a whole frame's pairs, in pair order.
    pub fn add_frame(&mut self, matches: &[IntervalMatch]) {
        for m in matches {
            self.add(m);
        }
    }

    /// `10 / (weighted mean complexity)`, or undefined when nothing was scored.
    pub fn score(&self) -> ConsonanceScore {
        if self.total_weight == 0.0 {
            return ConsonanceScore::Undefined;
        }
        let avg_complexity = self.total_weighted_complexity / self.total_weight;
        ConsonanceScore::Defined(10.0 / avg_complexity)
    }
}

/// Final per-file result. Higher means simpler, more consonant intervals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "Option<f64>")]
pub enum ConsonanceScore {
    Defined(f64),
    /// No interval passed the filters anywhere in the file.
    Undefined,
}

impl ConsonanceScore {
    /// The score as a double, NaN when undefined.
    pub fn as_f64(&self) -> f64 {
        match self {
            ConsonanceScore::Defined(v) => *v,
            ConsonanceScore::Undefined => f64::NAN,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ConsonanceScore::Defined(v) => Some(*v),
            ConsonanceScore::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, ConsonanceScore::Defined(_))
    }
}

impl From<ConsonanceScore> for Option<f64> {
    fn from(score: ConsonanceScore) -> Self {
        score.value()
    }
}

impl std::fmt::Display for ConsonanceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsonanceScore::Defined(v) => write!(f, "{v:.4}"),
            ConsonanceScore::Undefined => write!(f, "undefined"),
        }
    }
}
