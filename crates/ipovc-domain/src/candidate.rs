//! Venture-capital shareholder candidates and their ranking

use crate::percent::format_percent;
use std::cmp::Ordering;
use std::fmt;

/// A provisional largest-VC-shareholder hit found in the text
///
/// `percent` is `None` when the line carried no usable percentage. Such
/// candidates rank below every candidate with an observed percentage,
/// including an observed `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Institution name as matched in the text
    pub name: String,

    /// Largest percentage on the same line, in [0, 100]
    pub percent: Option<f64>,
}

impl Candidate {
    /// Create a new candidate
    pub fn new(name: impl Into<String>, percent: Option<f64>) -> Self {
        Self {
            name: name.into(),
            percent,
        }
    }

    /// Percentage used for ordering (unset counts as 0.0)
    pub fn rank_percent(&self) -> f64 {
        self.percent.unwrap_or(0.0)
    }

    /// Ranking order: descending percent, unset percent last
    pub fn rank_cmp(&self, other: &Candidate) -> Ordering {
        match (self.percent, other.percent) {
            (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent {
            Some(p) => write!(f, "{} ({})", self.name, format_percent(p)),
            None => write!(f, "{} (未披露)", self.name),
        }
    }
}

/// Sort candidates into ranking order
///
/// The sort is stable, so equal-ranked candidates keep their line order.
pub fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(Candidate::rank_cmp);
}
