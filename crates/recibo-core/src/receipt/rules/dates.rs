//! Date candidate scanning
//!
//! Numeric formats are locale-ambiguous: 03/04/2025 reads as March 4th in
//! the US and April 3rd in most of Latin America. A component over 12
//! settles the order by itself; otherwise the configured order decides.

use super::patterns::{
    DATE_MONTH_NAME_AFTER_DAY, DATE_MONTH_NAME_BEFORE_DAY, DATE_NUMERIC_DMY, DATE_NUMERIC_YMD,
    ENGLISH_MONTHS, SPANISH_MONTHS,
};
use super::{Candidate, FieldScanner};
use crate::models::DateOrder;
use chrono::NaiveDate;
use tracing::debug;

/// Structurally validated dates are rarely false positives.
const DATE_CONFIDENCE: f32 = 0.9;

/// Scans text for the transaction date.
pub struct DateScanner {
    date_order: DateOrder,
}

impl DateScanner {
    pub fn new(date_order: DateOrder) -> Self {
        Self { date_order }
    }

    fn resolve_day_month(&self, first: u32, second: u32) -> (u32, u32) {
        if first > 12 {
            (first, second)
        } else if second > 12 {
            (second, first)
        } else {
            match self.date_order {
                DateOrder::MonthFirst => (second, first),
                DateOrder::DayFirst => (first, second),
            }
        }
    }
}

impl Default for DateScanner {
    fn default() -> Self {
        Self::new(DateOrder::MonthFirst)
    }
}

impl FieldScanner for DateScanner {
    type Output = NaiveDate;

    /// First valid date across the pattern families wins.
    fn scan(&self, text: &str) -> Option<Candidate<NaiveDate>> {
        self.scan_all(text).into_iter().next()
    }

    fn scan_all(&self, text: &str) -> Vec<Candidate<NaiveDate>> {
        let mut candidates = Vec::new();

        for caps in DATE_NUMERIC_DMY.captures_iter(text) {
            let (Ok(first), Ok(second), Ok(year)) =
                (caps[1].parse::<u32>(), caps[2].parse::<u32>(), caps[3].parse::<i32>())
            else {
                continue;
            };
            let (day, month) = self.resolve_day_month(first, second);
            let Some(date) = build_date(year, month, day) else {
                debug!("Rejected invalid calendar date: {}", &caps[0]);
                continue;
            };
            let m = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            candidates
                .push(Candidate::new(date, DATE_CONFIDENCE, "numeric_dmy").with_position(m.0, m.1));
        }

        for caps in DATE_NUMERIC_YMD.captures_iter(text) {
            let (Ok(year), Ok(month), Ok(day)) =
                (caps[1].parse::<i32>(), caps[2].parse::<u32>(), caps[3].parse::<u32>())
            else {
                continue;
            };
            let Some(date) = build_date(year, month, day) else {
                continue;
            };
            let m = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            candidates
                .push(Candidate::new(date, DATE_CONFIDENCE, "numeric_ymd").with_position(m.0, m.1));
        }

        for caps in DATE_MONTH_NAME_AFTER_DAY.captures_iter(text) {
            let Some(month) = month_from_name(&caps[2]) else {
                continue;
            };
            let (Ok(day), Ok(year)) = (caps[1].parse::<u32>(), caps[3].parse::<i32>()) else {
                continue;
            };
            let Some(date) = build_date(year, month, day) else {
                continue;
            };
            let m = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            candidates
                .push(Candidate::new(date, DATE_CONFIDENCE, "month_name").with_position(m.0, m.1));
        }

        for caps in DATE_MONTH_NAME_BEFORE_DAY.captures_iter(text) {
            let Some(month) = month_from_name(&caps[1]) else {
                continue;
            };
            let (Ok(day), Ok(year)) = (caps[2].parse::<u32>(), caps[3].parse::<i32>()) else {
                continue;
            };
            let Some(date) = build_date(year, month, day) else {
                continue;
            };
            let m = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            candidates
                .push(Candidate::new(date, DATE_CONFIDENCE, "month_name").with_position(m.0, m.1));
        }

        candidates
    }
}

/// Validates the year window and calendar correctness, leap years included.
fn build_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(1900..=2100).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Resolves a month name against the Spanish and English name lists.
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    SPANISH_MONTHS
        .iter()
        .position(|m| *m == name)
        .or_else(|| ENGLISH_MONTHS.iter().position(|m| *m == name))
        .map(|i| i as u32 + 1)
}
