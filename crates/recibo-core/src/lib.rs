//! # recibo-core
//!
//! Heuristic extraction of structured fields from free-form receipt text.
//!
//! Raw OCR output goes in; an amount, date, provider, and description come
//! out, each with a confidence score, plus a single decision on whether
//! the extraction is trustworthy enough to stand on its own or should be
//! escalated to an external analyzer.
//!
//! ## Example
//!
//! ```
//! use recibo_core::heuristic_extract;
//!
//! let result = heuristic_extract("Tienda Central S.A. - Total: $45.90 - 15/01/2025");
//! assert!(result.fields.amount.is_some());
//! assert!(!result.should_use_llm);
//! ```

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{AnalyzerError, ReciboError, Result};
pub use models::{
    ConfidenceWeights, DateOrder, EscalationConfig, ExtractedFields, ExtractionConfig,
    ExtractionResult, FieldConfidence, OcrText, ReciboConfig,
};
pub use receipt::{
    AnalyzerOutput, ConfidenceAggregator, ExtractionPipeline, FieldDisambiguator, HeuristicEngine,
    ReceiptAnalyzer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extracts receipt fields from raw text with the default configuration.
///
/// Shorthand for building a [`HeuristicEngine`] when no configuration or
/// OCR metadata is involved.
pub fn heuristic_extract(text: &str) -> ExtractionResult {
    HeuristicEngine::new().extract_text(text)
}
