//! Weighted confidence aggregation and the escalation decision

use crate::models::{ConfidenceWeights, ExtractedFields, FieldConfidence};

/// Combines per-field confidences into one score and decides whether the
/// heuristic result is trustworthy enough to stand on its own.
///
/// Amount and date carry most of the weight; a description is always
/// recoverable through its fallback, so it barely moves the needle.
pub struct ConfidenceAggregator {
    weights: ConfidenceWeights,
    threshold: f32,
}

impl ConfidenceAggregator {
    pub fn new(weights: ConfidenceWeights, threshold: f32) -> Self {
        Self { weights, threshold }
    }

    /// Weighted overall confidence.
    pub fn overall(&self, confidence: &FieldConfidence) -> f32 {
        confidence.amount * self.weights.amount
            + confidence.date * self.weights.date
            + confidence.provider * self.weights.provider
            + confidence.description * self.weights.description
    }

    /// True when the result should be escalated to the external analyzer.
    ///
    /// A missing amount always escalates, as does a result with neither
    /// date nor provider: without those anchors the extraction cannot be
    /// trusted no matter how the individual scores look.
    pub fn should_escalate(&self, fields: &ExtractedFields, confidence: &FieldConfidence) -> bool {
        if fields.amount.is_none() {
            return true;
        }
        if fields.date.is_none() && fields.provider.is_none() {
            return true;
        }
        self.overall(confidence) < self.threshold
    }
}

impl Default for ConfidenceAggregator {
    fn default() -> Self {
        Self::new(ConfidenceWeights::default(), 0.6)
    }
}
