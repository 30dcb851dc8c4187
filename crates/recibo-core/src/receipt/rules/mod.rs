//! Field extraction rules
//!
//! Each submodule scans raw receipt text for one field. Scanners propose
//! candidates from an ordered rule table, score them, and pick a winner;
//! they never fail, an empty scan is an absent field.

pub mod amounts;
pub mod dates;
pub mod description;
pub mod numbers;
pub mod patterns;
pub mod provider;

use serde::{Deserialize, Serialize};

/// A provisional value proposed by a single rule, before ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate<T> {
    /// The proposed field value.
    pub value: T,
    /// Confidence score (0.0 - 1.0) after contextual adjustments.
    pub confidence: f32,
    /// Byte span of the value in the source text.
    pub position: Option<(usize, usize)>,
    /// Identifier of the rule that proposed this value.
    pub rule: String,
}

impl<T> Candidate<T> {
    pub fn new(value: T, confidence: f32, rule: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            rule: rule.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Scans text for a single receipt field.
pub trait FieldScanner {
    type Output;

    /// Returns the winning candidate, or `None` when nothing matches.
    fn scan(&self, text: &str) -> Option<Candidate<Self::Output>>;

    /// Returns all surviving candidates, best first.
    fn scan_all(&self, text: &str) -> Vec<Candidate<Self::Output>>;
}
