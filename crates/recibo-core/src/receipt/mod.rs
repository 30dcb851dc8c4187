//! Receipt extraction engine
//!
//! Scanners propose candidates, the aggregator scores the assembled
//! result and decides escalation, and the disambiguator repairs collapsed
//! extractions before anything reaches the caller.

pub mod confidence;
pub mod engine;
pub mod repair;
pub mod rules;

pub use confidence::ConfidenceAggregator;
pub use engine::{AnalyzerOutput, ExtractionPipeline, HeuristicEngine, ReceiptAnalyzer};
pub use repair::FieldDisambiguator;
