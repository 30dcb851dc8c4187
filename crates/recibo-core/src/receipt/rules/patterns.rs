//! Regex patterns for receipt field extraction
//!
//! All patterns are compiled once at first use and shared immutably.
//! Rule tables in the scanner modules reference these statics in priority
//! order, so reweighting a rule never touches scanning control flow.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amount patterns, highest intrinsic trust first.

    /// Currency symbol or code directly before a number: "$150.00", "USD 99".
    pub static ref AMOUNT_CURRENCY_PREFIX: Regex =
        Regex::new(r"(?i)([$€£]|USD|EUR|MXN|ARS|CLP|COP)\s*(\d+(?:[.,]\d+)*)").unwrap();

    /// Labeled total with an optional currency marker: "Total: $1.234,56".
    pub static ref AMOUNT_LABELED_TOTAL: Regex = Regex::new(
        r"(?i)\b(?:total|suma|monto|importe|amount)\s*:?\s*([$€£]|USD|EUR|MXN|ARS|CLP|COP)?\s*(\d+(?:[.,]\d+)*)"
    )
    .unwrap();

    /// Number followed by a currency marker: "150.00 USD", "99,90€".
    pub static ref AMOUNT_SYMBOL_SUFFIX: Regex = Regex::new(
        r"(?i)(\d+(?:[.,]\d+)*)\s*([$€£]|(?:USD|EUR|MXN|ARS|CLP|COP)\b)"
    )
    .unwrap();

    /// Bare decimal-formatted number, optional trailing symbol: "1.234,56".
    pub static ref AMOUNT_DECIMAL: Regex =
        Regex::new(r"(\d+(?:[.,]\d{3})*[.,]\d{2})\b(?:\s*([$€£]))?").unwrap();

    /// Large bare number, plausible as a total: "1500", "150.5".
    pub static ref AMOUNT_LARGE_NUMBER: Regex =
        Regex::new(r"\b(\d{3,}(?:[.,]\d{1,2})?)\b").unwrap();

    /// Any number with a decimal separator.
    pub static ref AMOUNT_ANY_DECIMAL: Regex = Regex::new(r"\b(\d+[.,]\d+)\b").unwrap();

    /// Any bare integer, last resort.
    pub static ref AMOUNT_ANY_NUMBER: Regex = Regex::new(r"\b(\d+)\b").unwrap();

    /// Total keyword searched in the context window around a candidate.
    pub static ref TOTAL_KEYWORD: Regex = Regex::new(r"(?i)\b(?:total|suma)\b").unwrap();

    // Date patterns.

    /// Numeric date, day or month first: "15/01/2025", "01-15-2025".
    pub static ref DATE_NUMERIC_DMY: Regex =
        Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4})\b").unwrap();

    /// ISO-ordered numeric date: "2025-01-15".
    pub static ref DATE_NUMERIC_YMD: Regex =
        Regex::new(r"\b(\d{4})[/-](\d{1,2})[/-](\d{1,2})\b").unwrap();

    /// Day before a month name: "15 enero 2025", "15 de enero de 2025".
    pub static ref DATE_MONTH_NAME_AFTER_DAY: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+(?:de\s+)?([a-záéíóúñ]+)\.?,?\s+(?:de\s+)?(\d{4})\b"
    )
    .unwrap();

    /// Month name before the day: "enero 15 2025", "January 15, 2025".
    pub static ref DATE_MONTH_NAME_BEFORE_DAY: Regex = Regex::new(
        r"(?i)\b([a-záéíóúñ]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    )
    .unwrap();

    // Provider patterns, most specific first.

    /// Capitalized phrase ending in a legal or business suffix.
    pub static ref PROVIDER_SUFFIX: Regex = Regex::new(
        r"([A-ZÁÉÍÓÚÑÜ][\w.&'-]*(?:\s+[A-ZÁÉÍÓÚÑÜ][\w.&'-]*)*\s+(?:S\.?A\.?S\b\.?|S\.?R\.?L\b\.?|S\.?\s?A\b\.?(?:\s+de\s+C\.?V\b\.?)?|C\.?A\b\.?|Inc\b\.?|LLC\b|Ltd\b\.?|Corp\b\.?|Co\.|(?i:store|shop|tienda|market|supermercado|restaurante?|farmacia)\b))"
    )
    .unwrap();

    /// Explicit vendor label: "Razón Social: ...", "Proveedor: ...".
    pub static ref PROVIDER_LABELED: Regex = Regex::new(
        r"(?i)\b(?:raz[oó]n\s+social|company|empresa|proveedor|vendor|comercio|merchant)\s*:\s*([^\r\n]{3,60})"
    )
    .unwrap();

    /// Capitalized phrase right before a receipt-type noun.
    pub static ref PROVIDER_BEFORE_RECEIPT_NOUN: Regex = Regex::new(
        r"([A-ZÁÉÍÓÚÑÜ][\w.&'-]*(?:\s+[A-ZÁÉÍÓÚÑÜ][\w.&'-]*)*)\s+(?i:factura|ticket|recibo|boleta|nota)\b"
    )
    .unwrap();

    /// Generic multi-word capitalized phrase, weakest positive signal.
    pub static ref PROVIDER_CAPITALIZED: Regex = Regex::new(
        r"\b([A-ZÁÉÍÓÚÑÜ][\w'&-]*(?:\s+[A-ZÁÉÍÓÚÑÜ][\w'&-]*)+)\b"
    )
    .unwrap();

    /// Capitalized phrase right before a street-address token.
    pub static ref PROVIDER_BEFORE_ADDRESS: Regex = Regex::new(
        r"([A-ZÁÉÍÓÚÑÜ][\w.&'-]*(?:\s+[A-ZÁÉÍÓÚÑÜ][\w.&'-]*)*)\s*,?\s+(?:(?i:calle|avenida|carrera|jir[oó]n|street|avenue|road)\b|(?i:av|ave|rd|blvd)\.)"
    )
    .unwrap();

    // Description patterns.

    /// Labeled concept or item text: "Concepto: ...", "Detalle: ...".
    pub static ref DESCRIPTION_LABELED: Regex = Regex::new(
        r"(?i)\b(?:descripci[oó]n|concepto|detalle|art[ií]culos?|items?|productos?)\s*:\s*([^\r\n]{3,120})"
    )
    .unwrap();

    /// Item line shaped as quantity, text, price: "2 x Cafe Americano 45.00".
    pub static ref DESCRIPTION_ITEM_LINE: Regex = Regex::new(
        r"(?im)^\s*(\d{1,3})\s*(?:x\s*)?([A-Za-zÁÉÍÓÚÑÜáéíóúñü][\w\s'&.-]{3,80}?)\s+\$?(\d+[.,]\d{2})\b"
    )
    .unwrap();

    /// Generic multi-word phrase starting with a letter.
    pub static ref DESCRIPTION_PHRASE: Regex = Regex::new(
        r"\b([A-Za-zÁÉÍÓÚÑÜáéíóúñü][\w'&-]*(?:\s+[\w'&-]+){1,9})\b"
    )
    .unwrap();

    /// Purchase-indicating vocabulary, raises description trust.
    pub static ref PURCHASE_KEYWORD: Regex =
        Regex::new(r"(?i)\b(?:compra|purchase|producto|servicio)").unwrap();

    /// Two to four capitalized words, the shape of a proper name.
    pub static ref PROPER_NAME: Regex = Regex::new(
        r"^[A-ZÁÉÍÓÚÑÜ][\w.&'-]*(?:\s+[A-ZÁÉÍÓÚÑÜ][\w.&'-]*){1,3}$"
    )
    .unwrap();

    // Repair and scrub patterns for the disambiguation pass.

    /// Number-like substrings inside a description.
    pub static ref REPAIR_NUMBER: Regex = Regex::new(r"\d+(?:[.,]\d+)*").unwrap();

    /// Date with a 2- or 4-digit year inside a description.
    pub static ref REPAIR_DATE: Regex =
        Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{4}|\d{2})\b").unwrap();

    /// Date-shaped substrings, removed from final descriptions.
    pub static ref SCRUB_DATE: Regex = Regex::new(r"\b\d{1,4}[/-]\d{1,2}[/-]\d{1,4}\b").unwrap();

    /// Amount-shaped substrings with optional currency markers, removed
    /// from final descriptions.
    pub static ref SCRUB_AMOUNT: Regex = Regex::new(
        r"(?i)(?:[$€£]|\b(?:USD|EUR|MXN|ARS|CLP|COP)\b)?\s*\b\d+(?:[.,]\d+)*\b(?:\s*(?:[$€£]|\b(?:USD|EUR|MXN|ARS|CLP|COP)\b))?"
    )
    .unwrap();

    /// Whitespace runs, collapsed to single spaces after scrubbing.
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Words that never belong in a provider or description value.
pub const RECEIPT_STOP_WORDS: [&str; 10] = [
    "TOTAL",
    "SUBTOTAL",
    "IVA",
    "DESCUENTO",
    "PAGO",
    "FECHA",
    "HORA",
    "CANTIDAD",
    "PRECIO",
    "ITEM",
];

/// Spanish month names, January to December.
pub const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// English month names, January to December.
pub const ENGLISH_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_prefix_captures_symbol_and_number() {
        let caps = AMOUNT_CURRENCY_PREFIX.captures("Pagado $1.234,56 en caja").unwrap();
        assert_eq!(&caps[1], "$");
        assert_eq!(&caps[2], "1.234,56");
    }

    #[test]
    fn test_labeled_total_with_and_without_symbol() {
        let caps = AMOUNT_LABELED_TOTAL.captures("Total: $150.00").unwrap();
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("$"));
        assert_eq!(&caps[2], "150.00");

        let caps = AMOUNT_LABELED_TOTAL.captures("Importe 99,90").unwrap();
        assert_eq!(caps.get(1), None);
        assert_eq!(&caps[2], "99,90");
    }

    #[test]
    fn test_symbol_suffix_rejects_embedded_codes() {
        assert!(AMOUNT_SYMBOL_SUFFIX.is_match("150.00 USD"));
        assert!(!AMOUNT_SYMBOL_SUFFIX.is_match("150 USDA beef"));
    }

    #[test]
    fn test_decimal_pattern_requires_full_match_of_fraction() {
        let m = AMOUNT_DECIMAL.find("0.05").unwrap();
        assert_eq!(m.as_str(), "0.05");
        // Three trailing digits are grouping, not a fraction.
        assert!(AMOUNT_DECIMAL.captures("12.345").is_none());
    }

    #[test]
    fn test_numeric_date_patterns() {
        assert!(DATE_NUMERIC_DMY.is_match("15/01/2025"));
        assert!(DATE_NUMERIC_DMY.is_match("01-15-2025"));
        assert!(!DATE_NUMERIC_DMY.is_match("2025-01-15"));
        assert!(DATE_NUMERIC_YMD.is_match("2025-01-15"));
    }

    #[test]
    fn test_month_name_patterns() {
        let caps = DATE_MONTH_NAME_AFTER_DAY.captures("15 de enero de 2025").unwrap();
        assert_eq!(&caps[1], "15");
        assert_eq!(&caps[2], "enero");
        assert_eq!(&caps[3], "2025");

        let caps = DATE_MONTH_NAME_BEFORE_DAY.captures("January 15, 2025").unwrap();
        assert_eq!(&caps[1], "January");
        assert_eq!(&caps[2], "15");
        assert_eq!(&caps[3], "2025");
    }

    #[test]
    fn test_provider_suffix_consumes_dotted_abbreviations() {
        let m = PROVIDER_SUFFIX.find("Supermercado ABC S.A. - Total").unwrap();
        assert_eq!(m.as_str(), "Supermercado ABC S.A.");

        let m = PROVIDER_SUFFIX.find("Farmacia Central SA de CV").unwrap();
        assert!(m.as_str().starts_with("Farmacia Central SA"));
    }

    #[test]
    fn test_provider_suffix_does_not_split_words() {
        // "SA" inside a longer capitalized word is not a legal suffix.
        assert!(!PROVIDER_SUFFIX.is_match("Mercado SAN"));
        assert!(!PROVIDER_SUFFIX.is_match("Acme Incredible"));
    }

    #[test]
    fn test_item_line_captures_text_between_quantity_and_price() {
        let caps = DESCRIPTION_ITEM_LINE.captures("2 x Cafe Americano 45.00").unwrap();
        assert_eq!(caps[2].trim(), "Cafe Americano");
    }

    #[test]
    fn test_proper_name_shape() {
        assert!(PROPER_NAME.is_match("Juan Perez"));
        assert!(PROPER_NAME.is_match("Supermercado ABC S.A."));
        assert!(!PROPER_NAME.is_match("Compra de alimentos"));
        assert!(!PROPER_NAME.is_match("Solo"));
    }

    #[test]
    fn test_scrub_amount_takes_currency_markers() {
        let scrubbed = SCRUB_AMOUNT.replace_all("Compra $150.00 efectivo", "");
        assert!(!scrubbed.contains("150"));
        assert!(!scrubbed.contains('$'));
    }
}
