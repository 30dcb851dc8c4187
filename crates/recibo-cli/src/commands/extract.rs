//! Extract command - pull structured fields from a single receipt text file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use recibo_core::{ExtractionPipeline, ExtractionResult, HeuristicEngine, OcrText, ReciboConfig};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file, or '-' to read from stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR confidence reported by the upstream engine (0.0 to 1.0)
    #[arg(long)]
    ocr_confidence: Option<f32>,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        ReciboConfig::from_file(Path::new(path))?
    } else {
        ReciboConfig::default()
    };

    if let Some(confidence) = args.ocr_confidence {
        if !(0.0..=1.0).contains(&confidence) {
            anyhow::bail!("OCR confidence must be between 0.0 and 1.0, got {}", confidence);
        }
    }

    info!("Processing input: {}", args.input.display());

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Reading input...");
    pb.set_position(10);

    let text = read_input(&args.input)?;
    if text.trim().is_empty() {
        pb.finish_and_clear();
        anyhow::bail!("Input contains no text");
    }

    pb.set_message("Extracting receipt fields...");
    pb.set_position(50);

    let ocr = match args.ocr_confidence {
        Some(confidence) => OcrText::new(text).with_confidence(confidence),
        None => OcrText::new(text),
    };

    let pipeline = ExtractionPipeline::new(HeuristicEngine::with_config(config));
    let result = pipeline.run(&ocr)?;

    pb.set_position(100);
    pb.finish_with_message("Done");

    // Surface non-fatal notes without polluting the formatted output
    if !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    // Format output
    let output = format_result(&result, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    // Show summary
    if args.show_confidence {
        println!();
        println!(
            "{} Overall confidence: {:.1}%",
            style("ℹ").blue(),
            result.overall_confidence * 100.0
        );
        println!(
            "   amount {:.2}, date {:.2}, provider {:.2}, description {:.2}",
            result.confidence.amount,
            result.confidence.date,
            result.confidence.provider,
            result.confidence.description
        );
        if result.should_use_llm {
            println!(
                "{} Confidence below threshold, review or LLM pass recommended",
                style("ℹ").blue()
            );
        }
        if let Some(time_ms) = result.processing_time_ms {
            println!("{} Processing time: {}ms", style("ℹ").blue(), time_ms);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Reads the receipt text from a file, or from stdin when the path is '-'.
fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(fs::read_to_string(input)?)
}

pub(crate) fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => format_text(result),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "provider",
        "amount",
        "currency",
        "date",
        "description",
        "overall_confidence",
        "needs_review",
    ])?;

    let fields = &result.fields;
    let provider = fields.provider.clone().unwrap_or_default();
    let amount = fields.amount.map(|a| a.to_string()).unwrap_or_default();
    let currency = fields.currency.clone().unwrap_or_default();
    let date = fields.date.map(|d| d.to_string()).unwrap_or_default();
    let description = fields.description.clone().unwrap_or_default();
    let overall = format!("{:.2}", result.overall_confidence);
    let needs_review = result.should_use_llm.to_string();

    // Write data
    wtr.write_record([
        &provider,
        &amount,
        &currency,
        &date,
        &description,
        &overall,
        &needs_review,
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut output = String::new();
    let fields = &result.fields;

    output.push_str("Receipt:\n");
    output.push_str(&format!(
        "  Provider:    {}\n",
        fields.provider.as_deref().unwrap_or("-")
    ));
    match (&fields.amount, &fields.currency) {
        (Some(amount), Some(currency)) => {
            output.push_str(&format!("  Amount:      {} {}\n", amount, currency));
        }
        (Some(amount), None) => {
            output.push_str(&format!("  Amount:      {}\n", amount));
        }
        _ => output.push_str("  Amount:      -\n"),
    }
    output.push_str(&format!(
        "  Date:        {}\n",
        fields
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "  Description: {}\n",
        fields.description.as_deref().unwrap_or("-")
    ));
    output.push_str("\n");

    output.push_str("Confidence:\n");
    output.push_str(&format!("  Amount:      {:.2}\n", result.confidence.amount));
    output.push_str(&format!("  Date:        {:.2}\n", result.confidence.date));
    output.push_str(&format!("  Provider:    {:.2}\n", result.confidence.provider));
    output.push_str(&format!(
        "  Description: {:.2}\n",
        result.confidence.description
    ));
    output.push_str(&format!("  Overall:     {:.2}\n", result.overall_confidence));
    output.push_str("\n");

    output.push_str(&format!(
        "Needs review: {}\n",
        if result.should_use_llm { "yes" } else { "no" }
    ));

    if let Some(ocr_confidence) = result.ocr_confidence {
        output.push_str(&format!("OCR confidence: {:.2}\n", ocr_confidence));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recibo_core::heuristic_extract;

    #[test]
    fn test_format_csv_single_record() {
        let result = heuristic_extract("Tienda Central S.A. - Total: $45.90 - 15/01/2025");
        let csv = format_csv(&result).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("provider,amount"));
        let data = lines.next().unwrap();
        assert!(data.contains("Tienda Central"));
        assert!(data.contains("45.90"));
        assert!(data.contains("2025-01-15"));
    }

    #[test]
    fn test_format_text_marks_missing_fields() {
        let result = heuristic_extract("");
        let text = format_text(&result).unwrap();
        assert!(text.contains("Provider:    -"));
        assert!(text.contains("Amount:      -"));
        assert!(text.contains("Needs review: yes"));
    }

    #[test]
    fn test_format_json_is_valid() {
        let result = heuristic_extract("Total: $12.50");
        let json = format_result(&result, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("fields").is_some());
        assert!(value.get("should_use_llm").is_some());
    }
}
