//! Numeric comparison between a reference value and its comparison counterpart

/// Absolute differences at or below this are treated as "no change"
pub const DIFF_EPSILON: f64 = 1e-4;

/// Presentation weight of a rendered value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Smaller than, or equal to, its counterpart
    Dimmed,
    /// Strictly larger than its counterpart
    Highlighted,
    /// Not part of a numeric comparison
    Neutral,
}

impl Emphasis {
    /// CSS class used by the HTML renderers
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Dimmed => "value-dimmed",
            Self::Highlighted => "value-highlighted",
            Self::Neutral => "value-neutral",
        }
    }
}

/// Outcome of comparing two numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffResult {
    /// `comparison - reference`
    pub difference: f64,
    /// `"+"` for strictly positive differences, empty otherwise
    pub sign: &'static str,
    pub reference_emphasis: Emphasis,
    pub comparison_emphasis: Emphasis,
}

impl DiffResult {
    /// Whether the difference is large enough to display
    pub fn is_significant(&self) -> bool {
        self.difference.abs() > DIFF_EPSILON
    }
}

/// Compare a reference value against a comparison value
pub fn compute_diff(reference: f64, comparison: f64) -> DiffResult {
    let difference = comparison - reference;

    DiffResult {
        difference,
        sign: if difference > 0.0 { "+" } else { "" },
        reference_emphasis: emphasis_for(reference, comparison),
        comparison_emphasis: emphasis_for(comparison, reference),
    }
}

fn emphasis_for(value: f64, counterpart: f64) -> Emphasis {
    if value > counterpart {
        Emphasis::Highlighted
    } else {
        Emphasis::Dimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_difference() {
        let diff = compute_diff(10.0, 15.0);
        assert_eq!(diff.difference, 5.0);
        assert_eq!(diff.sign, "+");
        assert_eq!(diff.reference_emphasis, Emphasis::Dimmed);
        assert_eq!(diff.comparison_emphasis, Emphasis::Highlighted);
    }

    #[test]
    fn test_negative_difference() {
        let diff = compute_diff(15.0, 10.0);
        assert_eq!(diff.difference, -5.0);
        assert_eq!(diff.sign, "");
        assert_eq!(diff.reference_emphasis, Emphasis::Highlighted);
        assert_eq!(diff.comparison_emphasis, Emphasis::Dimmed);
    }

    #[test]
    fn test_tie_dims_both_sides() {
        let diff = compute_diff(3.5, 3.5);
        assert_eq!(diff.difference, 0.0);
        assert_eq!(diff.sign, "");
        assert_eq!(diff.reference_emphasis, Emphasis::Dimmed);
        assert_eq!(diff.comparison_emphasis, Emphasis::Dimmed);
        assert!(!diff.is_significant());
    }

    #[test]
    fn test_difference_is_exact_for_sampled_pairs() {
        let samples = [-1e9, -2.5, -0.0, 0.0, 1e-9, 0.1, 0.2, 42.0, 1e12];
        for &a in &samples {
            for &b in &samples {
                let diff = compute_diff(a, b);
                assert_eq!(diff.difference, b - a);
                assert_eq!(diff.sign == "+", b - a > 0.0);
                if a == b {
                    assert_eq!(diff.reference_emphasis, Emphasis::Dimmed);
                    assert_eq!(diff.comparison_emphasis, Emphasis::Dimmed);
                }
            }
        }
    }

    #[test]
    fn test_epsilon_absorbs_round_trip_noise() {
        assert!(!compute_diff(10.00001, 10.00002).is_significant());
        assert!(compute_diff(10.0, 10.001).is_significant());
    }
}
