//! Provider candidate scanning
//!
//! Five pattern families ordered by specificity. A legal suffix is the
//! strongest signal; a capitalized phrase on its own is the weakest.

use super::patterns::{
    PROVIDER_BEFORE_ADDRESS, PROVIDER_BEFORE_RECEIPT_NOUN, PROVIDER_CAPITALIZED, PROVIDER_LABELED,
    PROVIDER_SUFFIX, RECEIPT_STOP_WORDS, WHITESPACE_RUN,
};
use super::{Candidate, FieldScanner};
use regex::Regex;
use tracing::debug;

const MIN_PROVIDER_LEN: usize = 3;
const MAX_PROVIDER_LEN: usize = 50;
/// Below this length a digit marks the value as number noise, not a name.
const DIGIT_TOLERANCE_LEN: usize = 8;

/// One entry of the ordered provider rule table.
struct ProviderRule {
    pattern: &'static Regex,
    confidence: f32,
    id: &'static str,
    group: usize,
}

fn provider_rules() -> [ProviderRule; 5] {
    [
        ProviderRule {
            pattern: &PROVIDER_SUFFIX,
            confidence: 0.9,
            id: "business_suffix",
            group: 0,
        },
        ProviderRule {
            pattern: &PROVIDER_LABELED,
            confidence: 0.85,
            id: "labeled",
            group: 1,
        },
        ProviderRule {
            pattern: &PROVIDER_BEFORE_RECEIPT_NOUN,
            confidence: 0.8,
            id: "before_receipt_noun",
            group: 1,
        },
        ProviderRule {
            pattern: &PROVIDER_CAPITALIZED,
            confidence: 0.7,
            id: "capitalized_phrase",
            group: 1,
        },
        ProviderRule {
            pattern: &PROVIDER_BEFORE_ADDRESS,
            confidence: 0.6,
            id: "before_address",
            group: 1,
        },
    ]
}

/// Scans text for the vendor name.
#[derive(Default)]
pub struct ProviderScanner;

impl ProviderScanner {
    pub fn new() -> Self {
        Self
    }
}

impl FieldScanner for ProviderScanner {
    type Output = String;

    /// Highest rule confidence wins; the first match seen wins ties.
    fn scan(&self, text: &str) -> Option<Candidate<String>> {
        self.scan_all(text).into_iter().next()
    }

    fn scan_all(&self, text: &str) -> Vec<Candidate<String>> {
        let mut candidates = Vec::new();

        for rule in provider_rules() {
            for caps in rule.pattern.captures_iter(text) {
                let Some(m) = caps.get(rule.group) else {
                    continue;
                };
                let value = clean_provider(m.as_str());
                if !is_valid_provider(&value) {
                    continue;
                }
                debug!("Provider candidate '{}' from rule {}", value, rule.id);
                candidates.push(
                    Candidate::new(value, rule.confidence, rule.id)
                        .with_position(m.start(), m.end()),
                );
            }
        }

        // Stable sort keeps first-seen order within equal confidences.
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        candidates
    }
}

/// Trims, collapses whitespace, and drops trailing separator punctuation.
fn clean_provider(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw.trim(), " ");
    collapsed
        .trim_end_matches([',', ';', ':', '-'])
        .trim_end()
        .to_string()
}

fn is_valid_provider(value: &str) -> bool {
    let len = value.chars().count();
    if !(MIN_PROVIDER_LEN..=MAX_PROVIDER_LEN).contains(&len) {
        return false;
    }
    let upper = value.to_uppercase();
    if RECEIPT_STOP_WORDS.iter().any(|w| upper.contains(w)) {
        return false;
    }
    if len < DIGIT_TOLERANCE_LEN && value.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    true
}
