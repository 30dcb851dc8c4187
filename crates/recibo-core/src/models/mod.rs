//! Data models for receipts and configuration

pub mod config;
pub mod receipt;

pub use config::{ConfidenceWeights, DateOrder, EscalationConfig, ExtractionConfig, ReciboConfig};
pub use receipt::{ExtractedFields, ExtractionResult, FieldConfidence, OcrText};
