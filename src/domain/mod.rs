//! Domain types for road-surface severity classification.
//!
//! The label set and its index order form the contract with the trained
//! model: the model's output vector was produced against this exact
//! ordering, and it cannot be rederived at runtime.

use crate::core::constants::{PROBABILITY_SUM_TOLERANCE, SEVERITY_NUM_CLASSES};
use crate::core::errors::ClassifierError;
use serde::{Deserialize, Serialize};

/// Severity of road-surface damage.
///
/// The variant order matches the training-time class indices
/// (`moderate = 0`, `normal = 1`, `severe = 2`). Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLabel {
    /// Moderate pothole damage; maintenance recommended.
    Moderate,
    /// No significant damage detected.
    Normal,
    /// Severe pothole damage; immediate repair required.
    Severe,
}

impl SeverityLabel {
    /// All labels in model output-vector order.
    pub const ALL: [SeverityLabel; SEVERITY_NUM_CLASSES] = [
        SeverityLabel::Moderate,
        SeverityLabel::Normal,
        SeverityLabel::Severe,
    ];

    /// Returns the label at the given model output index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the model output index of this label.
    pub fn index(self) -> usize {
        match self {
            SeverityLabel::Moderate => 0,
            SeverityLabel::Normal => 1,
            SeverityLabel::Severe => 2,
        }
    }

    /// Returns the lowercase label string.
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityLabel::Moderate => "moderate",
            SeverityLabel::Normal => "normal",
            SeverityLabel::Severe => "severe",
        }
    }

    /// Returns a short advisory line for displaying this label to a user.
    pub fn advisory(self) -> &'static str {
        match self {
            SeverityLabel::Normal => "Road appears safe. No significant potholes detected.",
            SeverityLabel::Moderate => "Moderate pothole detected. Maintenance recommended.",
            SeverityLabel::Severe => "Severe pothole detected. Immediate repair required.",
        }
    }
}

impl std::fmt::Display for SeverityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying a single road-surface image.
///
/// Invariants: `label` is the class at the argmax of `probabilities`, and
/// `confidence` equals `probabilities[label.index()]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityPrediction {
    /// The predicted severity class.
    pub label: SeverityLabel,
    /// The probability mass assigned to the predicted class, in [0, 1].
    pub confidence: f32,
    /// Per-class probabilities in model output order.
    pub probabilities: [f32; SEVERITY_NUM_CLASSES],
}

impl SeverityPrediction {
    /// Builds a prediction from a model probability vector.
    ///
    /// The vector must have exactly [`SEVERITY_NUM_CLASSES`] finite entries.
    /// The predicted label is the argmax; ties resolve to the lowest index.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::InvalidInput` if the vector has the wrong
    /// arity or contains non-finite values.
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Self, ClassifierError> {
        if probabilities.len() != SEVERITY_NUM_CLASSES {
            return Err(ClassifierError::invalid_input(format!(
                "expected {} class probabilities, got {}",
                SEVERITY_NUM_CLASSES,
                probabilities.len()
            )));
        }

        for (i, &p) in probabilities.iter().enumerate() {
            if !p.is_finite() {
                return Err(ClassifierError::invalid_input(format!(
                    "probability at index {} is not finite: {}",
                    i, p
                )));
            }
        }

        let &(best, _) = crate::processors::rank_classes(probabilities, 1)
            .first()
            .ok_or_else(|| ClassifierError::invalid_input("empty probability vector"))?;

        let label = SeverityLabel::from_index(best).ok_or_else(|| {
            ClassifierError::invalid_input(format!("argmax index {} out of label range", best))
        })?;

        let mut fixed = [0.0f32; SEVERITY_NUM_CLASSES];
        fixed.copy_from_slice(probabilities);

        Ok(Self {
            label,
            confidence: probabilities[best],
            probabilities: fixed,
        })
    }

    /// Returns `(label, probability)` pairs in model output order.
    pub fn scores(&self) -> impl Iterator<Item = (SeverityLabel, f32)> + '_ {
        SeverityLabel::ALL
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Returns `(label, probability)` pairs sorted by descending probability.
    pub fn ranked(&self) -> Vec<(SeverityLabel, f32)> {
        crate::processors::rank_classes(&self.probabilities, SEVERITY_NUM_CLASSES)
            .into_iter()
            .filter_map(|(i, p)| SeverityLabel::from_index(i).map(|label| (label, p)))
            .collect()
    }

    /// Returns true when the probability vector sums to one within tolerance.
    pub fn is_distribution(&self) -> bool {
        let sum: f32 = self.probabilities.iter().sum();
        (sum - 1.0).abs() <= PROBABILITY_SUM_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_order_matches_training_indices() {
        assert_eq!(SeverityLabel::from_index(0), Some(SeverityLabel::Moderate));
        assert_eq!(SeverityLabel::from_index(1), Some(SeverityLabel::Normal));
        assert_eq!(SeverityLabel::from_index(2), Some(SeverityLabel::Severe));
        assert_eq!(SeverityLabel::from_index(3), None);

        for (i, label) in SeverityLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
        }
    }

    #[test]
    fn test_prediction_argmax_invariant() {
        let pred = SeverityPrediction::from_probabilities(&[0.1, 0.2, 0.7]).unwrap();
        assert_eq!(pred.label, SeverityLabel::Severe);
        assert_eq!(pred.confidence, 0.7);
        assert!(pred.is_distribution());
    }

    #[test]
    fn test_prediction_tie_resolves_to_lowest_index() {
        let pred = SeverityPrediction::from_probabilities(&[0.4, 0.4, 0.2]).unwrap();
        assert_eq!(pred.label, SeverityLabel::Moderate);
    }

    #[test]
    fn test_prediction_rejects_wrong_arity() {
        assert!(SeverityPrediction::from_probabilities(&[0.5, 0.5]).is_err());
        assert!(SeverityPrediction::from_probabilities(&[]).is_err());
    }

    #[test]
    fn test_prediction_rejects_non_finite() {
        assert!(SeverityPrediction::from_probabilities(&[0.5, f32::NAN, 0.5]).is_err());
        assert!(SeverityPrediction::from_probabilities(&[0.5, f32::INFINITY, 0.5]).is_err());
    }

    #[test]
    fn test_prediction_determinism() {
        let probs = [0.25, 0.5, 0.25];
        let a = SeverityPrediction::from_probabilities(&probs).unwrap();
        let b = SeverityPrediction::from_probabilities(&probs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ranked_is_descending() {
        let pred = SeverityPrediction::from_probabilities(&[0.3, 0.1, 0.6]).unwrap();
        let ranked = pred.ranked();
        assert_eq!(ranked[0].0, SeverityLabel::Severe);
        assert_eq!(ranked[1].0, SeverityLabel::Moderate);
        assert_eq!(ranked[2].0, SeverityLabel::Normal);
    }

    #[test]
    fn test_label_serde_roundtrip() {
        let json = serde_json::to_string(&SeverityLabel::Severe).unwrap();
        assert_eq!(json, "\"severe\"");
        let back: SeverityLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SeverityLabel::Severe);
    }
}
