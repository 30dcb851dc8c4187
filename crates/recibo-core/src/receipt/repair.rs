//! Post-hoc field repair and cross-contamination scrubbing
//!
//! Both extraction paths can degenerate into a single catch-all
//! description. This pass detects the collapse, re-derives the missing
//! fields from the description, and strips field values that leaked into
//! the final description text.

use super::rules::numbers::normalize_number;
use super::rules::patterns::{
    PROVIDER_SUFFIX, REPAIR_DATE, REPAIR_NUMBER, SCRUB_AMOUNT, SCRUB_DATE, WHITESPACE_RUN,
};
use crate::models::{DateOrder, ExtractedFields, FieldConfidence};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

/// Confidence assigned to a field recovered from a collapsed description.
const REPAIR_CONFIDENCE: f32 = 0.5;
/// Description length that signals a collapsed extraction.
const COLLAPSE_TRIGGER_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 100;
const MIN_DESCRIPTION_LEN: usize = 5;

/// Repairs collapsed extractions and keeps fields from contaminating each
/// other. Applied to heuristic and analyzer results alike.
pub struct FieldDisambiguator {
    date_order: DateOrder,
}

impl FieldDisambiguator {
    pub fn new(date_order: DateOrder) -> Self {
        Self { date_order }
    }

    /// Runs the repair pass when the collapse trigger fires, then always
    /// scrubs the description.
    pub fn disambiguate(&self, fields: &mut ExtractedFields, confidence: &mut FieldConfidence) {
        if is_collapsed(fields) {
            debug!("Description collapse detected, repairing fields");
            self.repair(fields, confidence);
        }
        scrub_description(fields, confidence);
    }

    fn repair(&self, fields: &mut ExtractedFields, confidence: &mut FieldConfidence) {
        let Some(description) = fields.description.clone() else {
            return;
        };

        let repaired_amount = REPAIR_NUMBER
            .find_iter(&description)
            .filter_map(|m| normalize_number(m.as_str()))
            .filter(|value| *value > Decimal::ZERO)
            .max();
        if let Some(amount) = repaired_amount {
            debug!("Repaired amount {} from description", amount);
            fields.amount = Some(amount);
            confidence.amount = REPAIR_CONFIDENCE;
        }

        if let Some(m) = PROVIDER_SUFFIX.find(&description) {
            debug!("Repaired provider '{}' from description", m.as_str());
            fields.provider = Some(m.as_str().trim().to_string());
            confidence.provider = REPAIR_CONFIDENCE;
        }

        if fields.date.is_none() {
            if let Some(date) = self.first_date(&description) {
                debug!("Repaired date {} from description", date);
                fields.date = Some(date);
                confidence.date = REPAIR_CONFIDENCE;
            }
        }

        if description.chars().count() > MAX_DESCRIPTION_LEN {
            let truncated: String = description.chars().take(MAX_DESCRIPTION_LEN).collect();
            fields.description = Some(format!("{truncated}..."));
        }
    }

    /// First calendar-valid D/M/Y-shaped date in the text. A two-digit
    /// year is read as 20xx.
    fn first_date(&self, text: &str) -> Option<NaiveDate> {
        for caps in REPAIR_DATE.captures_iter(text) {
            let (Ok(first), Ok(second), Ok(year)) =
                (caps[1].parse::<u32>(), caps[2].parse::<u32>(), caps[3].parse::<i32>())
            else {
                continue;
            };
            let year = if caps[3].len() == 2 { 2000 + year } else { year };
            if !(1900..=2100).contains(&year) {
                continue;
            }
            let (day, month) = if first > 12 {
                (first, second)
            } else if second > 12 {
                (second, first)
            } else {
                match self.date_order {
                    DateOrder::MonthFirst => (second, first),
                    DateOrder::DayFirst => (first, second),
                }
            };
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
        None
    }
}

impl Default for FieldDisambiguator {
    fn default() -> Self {
        Self::new(DateOrder::MonthFirst)
    }
}

fn is_collapsed(fields: &ExtractedFields) -> bool {
    let description_len = fields
        .description
        .as_ref()
        .map(|d| d.chars().count())
        .unwrap_or(0);
    description_len > COLLAPSE_TRIGGER_LEN && fields.provider.is_none() && fields.amount.is_none()
}

/// Removes amount-shaped and date-shaped substrings and any occurrence of
/// the provider from the description, then collapses whitespace. A
/// description scrubbed down to nothing, or absent entirely, is replaced
/// by the fallback value.
fn scrub_description(fields: &mut ExtractedFields, confidence: &mut FieldConfidence) {
    let description = fields.description.clone().unwrap_or_default();
    // Synthesized fallbacks reference the provider on purpose; scrubbing
    // them would eat their own text.
    if is_fallback_description(&description, fields.provider.as_deref()) {
        return;
    }

    let mut scrubbed = SCRUB_DATE.replace_all(&description, " ").into_owned();
    scrubbed = SCRUB_AMOUNT.replace_all(&scrubbed, " ").into_owned();
    if let Some(provider) = &fields.provider {
        if let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(provider))) {
            scrubbed = pattern.replace_all(&scrubbed, " ").into_owned();
        }
    }
    let scrubbed = WHITESPACE_RUN.replace_all(scrubbed.trim(), " ").to_string();

    if scrubbed.chars().count() < MIN_DESCRIPTION_LEN {
        let (fallback, score) = match &fields.provider {
            Some(provider) => (format!("Compra en {provider}"), 0.5),
            None => ("Compra general".to_string(), 0.3),
        };
        debug!("Description scrubbed empty, using '{}'", fallback);
        fields.description = Some(fallback);
        confidence.description = score;
    } else if scrubbed != description {
        fields.description = Some(scrubbed);
    }
}

fn is_fallback_description(description: &str, provider: Option<&str>) -> bool {
    if description == "Compra general" || description == "Gasto registrado" {
        return true;
    }
    match provider {
        Some(provider) => description == format!("Compra en {provider}"),
        None => false,
    }
}
