//! Extraction engine and processing pipeline
//!
//! The heuristic engine and the external analyzer are interchangeable
//! strategies behind one field contract: both produce the same structure
//! and both pass through the disambiguation step before results reach the
//! caller.

use super::confidence::ConfidenceAggregator;
use super::repair::FieldDisambiguator;
use super::rules::amounts::AmountScanner;
use super::rules::dates::DateScanner;
use super::rules::description::DescriptionScanner;
use super::rules::provider::ProviderScanner;
use super::rules::FieldScanner;
use crate::error::{AnalyzerError, Result};
use crate::models::{ExtractedFields, ExtractionResult, FieldConfidence, OcrText, ReciboConfig};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// OCR confidence below this value earns a warning in the result.
const LOW_OCR_CONFIDENCE: f32 = 0.5;

/// Deterministic rule-based extraction engine.
///
/// Stateless per call: the same input text always produces the same
/// result, and concurrent calls need no coordination.
pub struct HeuristicEngine {
    config: ReciboConfig,
}

impl HeuristicEngine {
    pub fn new() -> Self {
        Self::with_config(ReciboConfig::default())
    }

    pub fn with_config(config: ReciboConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReciboConfig {
        &self.config
    }

    /// Runs the four field scanners over the input and assembles a scored,
    /// disambiguated result.
    pub fn extract(&self, ocr: &OcrText) -> ExtractionResult {
        let started = Instant::now();
        let text = ocr.text.as_str();
        let mut fields = ExtractedFields::new();
        let mut confidence = FieldConfidence::new();

        let amounts = AmountScanner::new(self.config.extraction.default_currency.as_str());
        if let Some(candidate) = amounts.scan(text) {
            debug!("Amount {} via rule {}", candidate.value.amount, candidate.rule);
            fields.amount = Some(candidate.value.amount);
            fields.currency = candidate.value.currency;
            confidence.amount = candidate.confidence;
        }

        let dates = DateScanner::new(self.config.extraction.date_order);
        if let Some(candidate) = dates.scan(text) {
            debug!("Date {} via rule {}", candidate.value, candidate.rule);
            fields.date = Some(candidate.value);
            confidence.date = candidate.confidence;
        }

        if let Some(candidate) = ProviderScanner::new().scan(text) {
            debug!("Provider '{}' via rule {}", candidate.value, candidate.rule);
            fields.provider = Some(candidate.value);
            confidence.provider = candidate.confidence;
        }

        let descriptions = DescriptionScanner::with_provider(fields.provider.as_deref());
        if let Some(candidate) = descriptions.scan(text) {
            debug!("Description '{}' via rule {}", candidate.value, candidate.rule);
            fields.description = Some(candidate.value);
            confidence.description = candidate.confidence;
        }

        let aggregator = ConfidenceAggregator::new(
            self.config.escalation.weights,
            self.config.escalation.threshold,
        );
        let overall_confidence = aggregator.overall(&confidence);
        let should_use_llm = aggregator.should_escalate(&fields, &confidence);

        FieldDisambiguator::new(self.config.extraction.date_order)
            .disambiguate(&mut fields, &mut confidence);

        let warnings = collect_warnings(&fields, ocr);
        let result = ExtractionResult {
            fields,
            confidence,
            overall_confidence,
            should_use_llm,
            ocr_confidence: ocr.confidence,
            warnings,
            processing_time_ms: Some(started.elapsed().as_millis() as u64),
        };
        info!(
            "Extraction finished: overall {:.2}, escalate {}",
            result.overall_confidence, result.should_use_llm
        );
        result
    }

    /// Convenience wrapper for plain text without OCR metadata.
    pub fn extract_text(&self, text: &str) -> ExtractionResult {
        self.extract(&OcrText::new(text))
    }
}

impl Default for HeuristicEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Notes for fields the extraction could not produce, plus a low-OCR
/// note. The description always carries at least the fallback value, so
/// it never goes missing.
fn collect_warnings(fields: &ExtractedFields, ocr: &OcrText) -> Vec<String> {
    let mut warnings = Vec::new();
    if fields.amount.is_none() {
        warnings.push("Could not extract amount".to_string());
    }
    if fields.date.is_none() {
        warnings.push("Could not extract date".to_string());
    }
    if fields.provider.is_none() {
        warnings.push("Could not extract provider".to_string());
    }
    if let Some(confidence) = ocr.confidence {
        if confidence < LOW_OCR_CONFIDENCE {
            warn!("Low OCR confidence: {:.2}", confidence);
            warnings.push(format!(
                "Low OCR confidence ({confidence:.2}), text may be unreliable"
            ));
        }
    }
    warnings
}

/// Structured fields an external analyzer must return. Mirrors the
/// engine's own output so the two paths are interchangeable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerOutput {
    pub fields: ExtractedFields,
    pub confidence: FieldConfidence,
}

/// External receipt analyzer consulted when heuristic confidence is too
/// low. Implementations typically wrap a language model call.
pub trait ReceiptAnalyzer: Send + Sync {
    fn analyze(&self, ocr: &OcrText) -> std::result::Result<AnalyzerOutput, AnalyzerError>;
}

/// Runs the heuristic engine first and hands off to the analyzer when the
/// escalation decision fires.
pub struct ExtractionPipeline {
    engine: HeuristicEngine,
    analyzer: Option<Box<dyn ReceiptAnalyzer>>,
}

impl ExtractionPipeline {
    pub fn new(engine: HeuristicEngine) -> Self {
        Self {
            engine,
            analyzer: None,
        }
    }

    pub fn with_analyzer(mut self, analyzer: Box<dyn ReceiptAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Extracts fields from the input, escalating when needed.
    ///
    /// Analyzer output goes through the same disambiguation pass as
    /// heuristic output. Analyzer failures are the one error this crate
    /// surfaces to callers.
    pub fn run(&self, ocr: &OcrText) -> Result<ExtractionResult> {
        let started = Instant::now();
        let heuristic = self.engine.extract(ocr);
        if !heuristic.should_use_llm {
            return Ok(heuristic);
        }
        let Some(analyzer) = &self.analyzer else {
            debug!("No analyzer configured, returning heuristic result");
            return Ok(heuristic);
        };

        info!("Escalating to external analyzer");
        let output = analyzer.analyze(ocr)?;
        let mut fields = output.fields;
        let mut confidence = output.confidence;

        let config = self.engine.config();
        FieldDisambiguator::new(config.extraction.date_order)
            .disambiguate(&mut fields, &mut confidence);
        let aggregator =
            ConfidenceAggregator::new(config.escalation.weights, config.escalation.threshold);
        let overall_confidence = aggregator.overall(&confidence);

        let warnings = collect_warnings(&fields, ocr);
        Ok(ExtractionResult {
            fields,
            confidence,
            overall_confidence,
            should_use_llm: true,
            ocr_confidence: ocr.confidence,
            warnings,
            processing_time_ms: Some(started.elapsed().as_millis() as u64),
        })
    }
}
