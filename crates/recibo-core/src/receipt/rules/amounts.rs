//! Amount candidate scanning and ranking
//!
//! Seven pattern rules propose candidates from the most trusted shape
//! (currency-prefixed numbers) down to bare integers. A number span claimed
//! by a higher rule is skipped by the lower ones, so the same digits never
//! produce two candidates.

use super::numbers::normalize_number;
use super::patterns::{
    AMOUNT_ANY_DECIMAL, AMOUNT_ANY_NUMBER, AMOUNT_CURRENCY_PREFIX, AMOUNT_DECIMAL,
    AMOUNT_LABELED_TOTAL, AMOUNT_LARGE_NUMBER, AMOUNT_SYMBOL_SUFFIX, TOTAL_KEYWORD,
};
use super::{Candidate, FieldScanner};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

/// Confidence gap under which two candidates count as tied.
const TIE_MARGIN: f32 = 0.05;
/// Context window inspected for a total keyword, in characters.
const KEYWORD_WINDOW: usize = 20;

/// An amount together with the currency marker that accompanied it.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountValue {
    pub amount: Decimal,
    pub currency: Option<String>,
}

/// One entry of the ordered amount rule table.
struct AmountRule {
    pattern: &'static Regex,
    base: f32,
    id: &'static str,
    number_group: usize,
    currency_group: Option<usize>,
}

fn amount_rules() -> [AmountRule; 7] {
    [
        AmountRule {
            pattern: &AMOUNT_CURRENCY_PREFIX,
            base: 0.98,
            id: "currency_prefix",
            number_group: 2,
            currency_group: Some(1),
        },
        AmountRule {
            pattern: &AMOUNT_LABELED_TOTAL,
            base: 0.95,
            id: "labeled_total",
            number_group: 2,
            currency_group: Some(1),
        },
        AmountRule {
            pattern: &AMOUNT_SYMBOL_SUFFIX,
            base: 0.90,
            id: "symbol_suffix",
            number_group: 1,
            currency_group: Some(2),
        },
        AmountRule {
            pattern: &AMOUNT_DECIMAL,
            base: 0.85,
            id: "bare_decimal",
            number_group: 1,
            currency_group: Some(2),
        },
        AmountRule {
            pattern: &AMOUNT_LARGE_NUMBER,
            base: 0.70,
            id: "large_number",
            number_group: 1,
            currency_group: None,
        },
        AmountRule {
            pattern: &AMOUNT_ANY_DECIMAL,
            base: 0.60,
            id: "any_decimal",
            number_group: 1,
            currency_group: None,
        },
        AmountRule {
            pattern: &AMOUNT_ANY_NUMBER,
            base: 0.40,
            id: "any_number",
            number_group: 1,
            currency_group: None,
        },
    ]
}

/// Scans text for the transaction amount.
pub struct AmountScanner {
    default_currency: String,
}

impl AmountScanner {
    pub fn new(default_currency: impl Into<String>) -> Self {
        Self {
            default_currency: default_currency.into(),
        }
    }
}

impl Default for AmountScanner {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl FieldScanner for AmountScanner {
    type Output = AmountValue;

    /// Picks the winner from the pooled candidates. Candidates whose
    /// confidence is within the tie margin of the best are resolved by
    /// preferring the larger amount; receipts truncate line items far more
    /// often than totals.
    fn scan(&self, text: &str) -> Option<Candidate<AmountValue>> {
        let candidates = self.scan_all(text);
        let best_confidence = candidates
            .iter()
            .map(|c| c.confidence)
            .fold(0.0f32, f32::max);

        let mut winner: Option<Candidate<AmountValue>> = None;
        for candidate in candidates {
            if candidate.confidence < best_confidence - TIE_MARGIN {
                continue;
            }
            winner = match winner {
                None => Some(candidate),
                Some(current) => {
                    if candidate.value.amount > current.value.amount
                        || (candidate.value.amount == current.value.amount
                            && candidate.confidence > current.confidence)
                    {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            };
        }

        winner.map(|mut candidate| {
            if candidate.value.currency.is_none() {
                candidate.value.currency = Some(self.default_currency.clone());
            }
            candidate
        })
    }

    fn scan_all(&self, text: &str) -> Vec<Candidate<AmountValue>> {
        let mut candidates = Vec::new();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        for rule in amount_rules() {
            for caps in rule.pattern.captures_iter(text) {
                let Some(number) = caps.get(rule.number_group) else {
                    continue;
                };
                let span = (number.start(), number.end());
                if claimed.iter().any(|&(s, e)| span.0 < e && s < span.1) {
                    continue;
                }
                let Some(amount) = normalize_number(number.as_str()) else {
                    continue;
                };
                if amount <= Decimal::ZERO {
                    continue;
                }
                let currency = rule
                    .currency_group
                    .and_then(|g| caps.get(g))
                    .map(|m| m.as_str().to_string());

                claimed.push(span);
                let confidence =
                    adjust_confidence(rule.base, amount, currency.is_some(), text, span);
                debug!("Amount candidate {} at {:.2} from rule {}", amount, confidence, rule.id);
                candidates.push(
                    Candidate::new(AmountValue { amount, currency }, confidence, rule.id)
                        .with_position(span.0, span.1),
                );
            }
        }

        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        candidates
    }
}

/// Applies the contextual adjustments on top of a rule's base confidence.
fn adjust_confidence(
    base: f32,
    amount: Decimal,
    has_currency: bool,
    text: &str,
    span: (usize, usize),
) -> f32 {
    let mut confidence = base;
    if has_currency {
        confidence += 0.05;
    }
    // Magnitude bands are cumulative: larger values look more total-like.
    if amount > Decimal::from(50) {
        confidence += 0.02;
    }
    if amount > Decimal::from(100) {
        confidence += 0.03;
    }
    if amount > Decimal::from(1000) {
        confidence += 0.02;
    }
    if amount < Decimal::ONE {
        confidence -= 0.2;
        if amount < Decimal::new(1, 1) {
            confidence -= 0.3;
        }
    }
    if near_total_keyword(text, span) {
        confidence += 0.1;
    }
    confidence.clamp(0.0, 1.0)
}

/// True when a total keyword appears within the context window on either
/// side of the candidate span.
fn near_total_keyword(text: &str, span: (usize, usize)) -> bool {
    let before_start = text[..span.0]
        .char_indices()
        .rev()
        .nth(KEYWORD_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let after_end = text[span.1..]
        .char_indices()
        .nth(KEYWORD_WINDOW)
        .map(|(i, _)| span.1 + i)
        .unwrap_or(text.len());

    TOTAL_KEYWORD.is_match(&text[before_start..span.0])
        || TOTAL_KEYWORD.is_match(&text[span.1..after_end])
}
