//! End-to-end extraction tests against the public API.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use recibo_core::receipt::rules::numbers::normalize_number;
use recibo_core::{
    heuristic_extract, DateOrder, ExtractedFields, FieldConfidence, FieldDisambiguator,
    HeuristicEngine, OcrText, ReciboConfig,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn separator_conventions_agree_on_value() {
    assert_eq!(normalize_number("123.45"), Some(dec("123.45")));
    assert_eq!(normalize_number("1,234.56"), Some(dec("1234.56")));
    assert_eq!(normalize_number("1.234,56"), Some(dec("1234.56")));
}

#[test]
fn full_receipt_on_one_line() {
    let result = heuristic_extract(
        "Supermercado ABC S.A. - Total: $150.00 - Fecha: 15/01/2025 - Compra de alimentos",
    );

    assert_eq!(result.fields.amount, Some(dec("150.00")));
    assert_eq!(result.fields.currency.as_deref(), Some("$"));
    assert_eq!(result.fields.date, NaiveDate::from_ymd_opt(2025, 1, 15));

    let provider = result.fields.provider.as_deref().unwrap();
    assert!(provider.contains("Supermercado ABC"));

    let description = result.fields.description.as_deref().unwrap();
    assert!(description.contains("alimentos"));
    assert!(!description.contains("150.00"));
    assert!(!description.contains("15/01/2025"));

    assert!(!result.should_use_llm);
}

#[test]
fn multiline_receipt() {
    let text = "Farmacia San Pablo Tienda\n\
                Av. Reforma 123\n\
                Fecha: 03/04/2025\n\
                2 x Paracetamol tabletas 45.90\n\
                Total: $45.90";
    let result = heuristic_extract(text);

    assert_eq!(result.fields.amount, Some(dec("45.90")));
    // Month-first default reads 03/04 as March 4th.
    assert_eq!(result.fields.date, NaiveDate::from_ymd_opt(2025, 3, 4));
    assert!(result.fields.provider.as_deref().unwrap().contains("Farmacia San Pablo"));
    assert!(!result.should_use_llm);
}

#[test]
fn date_order_hint_changes_ambiguous_reading() {
    let mut config = ReciboConfig::default();
    config.extraction.date_order = DateOrder::DayFirst;
    let engine = HeuristicEngine::with_config(config);

    let result = engine.extract_text("Tienda Central S.A. Total: $10.00 del 03/04/2025");
    assert_eq!(result.fields.date, NaiveDate::from_ymd_opt(2025, 4, 3));
}

#[test]
fn default_currency_from_config() {
    let mut config = ReciboConfig::default();
    config.extraction.default_currency = "MXN".to_string();
    let engine = HeuristicEngine::with_config(config);

    let result = engine.extract_text("Total 250.00");
    assert_eq!(result.fields.currency.as_deref(), Some("MXN"));
}

#[test]
fn unstructured_text_escalates() {
    let result = heuristic_extract("nota manuscrita sin datos utiles");
    assert!(result.should_use_llm);
    assert_eq!(result.fields.amount, None);
    assert!(result.overall_confidence < 0.6);
}

#[test]
fn amount_present_but_no_anchors_escalates() {
    // An amount alone cannot anchor the result; date and provider are both
    // missing, so escalation fires despite the strong amount score.
    let result = heuristic_extract("pagaste $199.99 hoy mismo");
    assert_eq!(result.fields.amount, Some(dec("199.99")));
    assert!(result.should_use_llm);
}

#[test]
fn ocr_confidence_is_reported_not_merged() {
    let strong = "Supermercado ABC S.A. - Total: $150.00 - Fecha: 15/01/2025";
    let with_low_ocr = HeuristicEngine::new().extract(&OcrText::new(strong).with_confidence(0.2));
    let with_high_ocr = HeuristicEngine::new().extract(&OcrText::new(strong).with_confidence(0.99));

    // The weighted score ignores OCR confidence entirely.
    assert_eq!(with_low_ocr.overall_confidence, with_high_ocr.overall_confidence);
    assert_eq!(with_low_ocr.ocr_confidence, Some(0.2));
    assert!(!with_low_ocr.warnings.is_empty());
}

#[test]
fn disambiguator_runs_on_analyzer_shaped_output() {
    // A collapsed result, as an external analyzer might return it.
    let mut fields = ExtractedFields {
        description: Some(
            "Compra variada en Comercial Andina S.A.S. por 320.50 el 12/03/2025 segun ticket adjunto"
                .to_string(),
        ),
        ..Default::default()
    };
    let mut confidence = FieldConfidence {
        description: 0.6,
        ..Default::default()
    };

    let disambiguator = FieldDisambiguator::new(DateOrder::DayFirst);
    disambiguator.disambiguate(&mut fields, &mut confidence);

    // The largest parsed number wins the amount repair, year included.
    assert_eq!(fields.amount, Some(dec("2025")));
    assert!(fields.provider.as_deref().unwrap().contains("Comercial Andina"));
    assert_eq!(fields.date, NaiveDate::from_ymd_opt(2025, 3, 12));

    let description = fields.description.unwrap();
    assert!(!description.contains("320.50"));
    assert!(!description.contains("12/03/2025"));
}

#[test]
fn repeated_disambiguation_is_stable() {
    let mut fields = ExtractedFields {
        description: Some(
            "Gasto de viaje en Transportes Rapidos S.A. por un total de 580.00 pesos en efectivo"
                .to_string(),
        ),
        ..Default::default()
    };
    let mut confidence = FieldConfidence::default();

    let disambiguator = FieldDisambiguator::new(DateOrder::MonthFirst);
    disambiguator.disambiguate(&mut fields, &mut confidence);
    let first_pass = fields.clone();
    disambiguator.disambiguate(&mut fields, &mut confidence);

    assert_eq!(fields, first_pass);
    assert_eq!(fields.amount, Some(dec("580.00")));
}

#[test]
fn results_serialize_to_json() {
    let result = heuristic_extract("Tienda Central S.A. Total: $45.90 - 15/01/2025");
    let json = serde_json::to_string_pretty(&result).unwrap();
    assert!(json.contains("\"should_use_llm\""));
    assert!(json.contains("\"overall_confidence\""));

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["fields"]["currency"], "$");
}
