//! Description candidate scanning
//!
//! The description is the one field that never comes back absent: when no
//! candidate survives filtering, a fallback value is synthesized from the
//! resolved provider or a generic placeholder.

use super::patterns::{
    DESCRIPTION_ITEM_LINE, DESCRIPTION_LABELED, DESCRIPTION_PHRASE, PROPER_NAME, PURCHASE_KEYWORD,
    RECEIPT_STOP_WORDS, WHITESPACE_RUN,
};
use super::{Candidate, FieldScanner};
use regex::Regex;
use tracing::debug;

const MIN_DESCRIPTION_LEN: usize = 5;
const MAX_DESCRIPTION_LEN: usize = 100;
/// Bonus for purchase-indicating vocabulary.
const PURCHASE_BONUS: f32 = 0.1;

/// One entry of the ordered description rule table.
struct DescriptionRule {
    pattern: &'static Regex,
    base: f32,
    id: &'static str,
    group: usize,
}

fn description_rules() -> [DescriptionRule; 3] {
    [
        DescriptionRule {
            pattern: &DESCRIPTION_LABELED,
            base: 0.9,
            id: "labeled",
            group: 1,
        },
        DescriptionRule {
            pattern: &DESCRIPTION_ITEM_LINE,
            base: 0.8,
            id: "item_line",
            group: 2,
        },
        DescriptionRule {
            pattern: &DESCRIPTION_PHRASE,
            base: 0.6,
            id: "generic_phrase",
            group: 1,
        },
    ]
}

/// Scans text for a purchase description.
#[derive(Default)]
pub struct DescriptionScanner {
    provider: Option<String>,
}

impl DescriptionScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved provider is excluded from description candidates so the
    /// vendor name is not duplicated across fields.
    pub fn with_provider(provider: Option<&str>) -> Self {
        Self {
            provider: provider.map(String::from),
        }
    }

    fn fallback(&self) -> Candidate<String> {
        match &self.provider {
            Some(provider) => {
                Candidate::new(format!("Compra en {provider}"), 0.5, "fallback_provider")
            }
            None => Candidate::new("Gasto registrado".to_string(), 0.3, "fallback_generic"),
        }
    }

    fn is_valid(&self, value: &str) -> bool {
        let len = value.chars().count();
        if !(MIN_DESCRIPTION_LEN..=MAX_DESCRIPTION_LEN).contains(&len) {
            return false;
        }
        let lower = value.to_lowercase();
        // A bare proper name is the vendor or a person, not a description.
        if PROPER_NAME.is_match(value) && !lower.contains("compra") {
            return false;
        }
        let upper = value.to_uppercase();
        if RECEIPT_STOP_WORDS.iter().any(|w| upper.contains(w)) {
            return false;
        }
        if let Some(provider) = &self.provider {
            if lower.contains(&provider.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

impl FieldScanner for DescriptionScanner {
    type Output = String;

    /// Always returns a value: the best surviving candidate or a fallback.
    fn scan(&self, text: &str) -> Option<Candidate<String>> {
        if let Some(candidate) = self.scan_all(text).into_iter().next() {
            return Some(candidate);
        }
        let fallback = self.fallback();
        debug!("No description candidate survived, using '{}'", fallback.value);
        Some(fallback)
    }

    fn scan_all(&self, text: &str) -> Vec<Candidate<String>> {
        let mut candidates = Vec::new();

        for rule in description_rules() {
            for caps in rule.pattern.captures_iter(text) {
                let Some(m) = caps.get(rule.group) else {
                    continue;
                };
                let value = WHITESPACE_RUN.replace_all(m.as_str().trim(), " ").to_string();
                if !self.is_valid(&value) {
                    continue;
                }
                let mut confidence = rule.base;
                if PURCHASE_KEYWORD.is_match(&value) {
                    confidence += PURCHASE_BONUS;
                }
                candidates.push(
                    Candidate::new(value, confidence.clamp(0.0, 1.0), rule.id)
                        .with_position(m.start(), m.end()),
                );
            }
        }

        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        candidates
    }
}
