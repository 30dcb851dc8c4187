//! Receipt data model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured fields extracted from a receipt text.
///
/// Every field is optional. A scanner that finds nothing leaves its field
/// as `None` rather than failing, so partial extractions are normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExtractedFields {
    /// Transaction amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    /// Currency symbol or ISO code attached to the amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Transaction date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Vendor or provider name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Short description of the purchase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExtractedFields {
    /// Creates an empty set of fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.currency.is_none()
            && self.date.is_none()
            && self.provider.is_none()
            && self.description.is_none()
    }

    /// Number of core fields present (amount, date, provider, description).
    pub fn field_count(&self) -> usize {
        [
            self.amount.is_some(),
            self.date.is_some(),
            self.provider.is_some(),
            self.description.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
    }
}

/// Per-field confidence scores (0.0 - 1.0).
///
/// A field that was not extracted has confidence 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldConfidence {
    pub amount: f32,
    pub date: f32,
    pub provider: f32,
    pub description: f32,
}

impl FieldConfidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest score across the four fields.
    pub fn min(&self) -> f32 {
        self.amount
            .min(self.date)
            .min(self.provider)
            .min(self.description)
    }
}

/// Raw OCR output handed to the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrText {
    /// Recognized text, typically one receipt per value.
    pub text: String,

    /// Mean recognition confidence reported by the OCR engine, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl OcrText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Complete result of a receipt extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Extracted field values.
    pub fields: ExtractedFields,

    /// Per-field confidence scores.
    pub confidence: FieldConfidence,

    /// Weighted overall confidence.
    pub overall_confidence: f32,

    /// True when the extraction should be retried with a language model.
    pub should_use_llm: bool,

    /// OCR engine confidence, forwarded from the input when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f32>,

    /// Non-fatal notes collected during extraction.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,

    /// Wall-clock time spent in the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl ExtractionResult {
    /// Creates an empty result that is flagged for escalation.
    pub fn empty() -> Self {
        Self {
            fields: ExtractedFields::new(),
            confidence: FieldConfidence::new(),
            overall_confidence: 0.0,
            should_use_llm: true,
            ocr_confidence: None,
            warnings: Vec::new(),
            processing_time_ms: None,
        }
    }

    /// True when all four core fields were extracted.
    pub fn is_complete(&self) -> bool {
        self.fields.field_count() == 4
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}
