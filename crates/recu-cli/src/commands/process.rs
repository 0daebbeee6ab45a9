//! Process command - run one OCR-text file through the pipeline.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use recu_core::{ProcessingMethod, ProcessingResult};

use super::Context;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file containing OCR'd receipt text
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence and timing
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, context: &Context) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let raw_text = fs::read_to_string(&args.input)?;
    let processor = context.processor();
    let result = processor.process_text(&raw_text);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => format_text(&result),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{output}");
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            result.confidence * 100.0
        );
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

fn format_text(result: &ProcessingResult) -> String {
    let mut output = String::new();

    let method = match result.processing_method {
        ProcessingMethod::Local => "local",
        ProcessingMethod::Ai => "ai",
        ProcessingMethod::Failed => "failed",
    };

    output.push_str(&format!("Merchant: {}\n", result.merchant));
    if let Some(date) = &result.date {
        output.push_str(&format!("Date: {date}\n"));
    }
    output.push_str(&format!("Method: {method}\n"));
    output.push('\n');

    output.push_str("Items:\n");
    for item in &result.items {
        output.push_str(&format!(
            "  {} - {} x {} = {} ({})\n",
            item.name,
            item.qty,
            item.price,
            item.total,
            item.normalized_name,
        ));
    }
    output.push('\n');

    if let Some(subtotal) = result.subtotal {
        output.push_str(&format!("Subtotal: {} {}\n", subtotal, result.currency));
    }
    if let Some(tax) = result.tax {
        output.push_str(&format!("Tax:      {} {}\n", tax, result.currency));
    }
    output.push_str(&format!("Total:    {} {}\n", result.total, result.currency));

    if let Some(error) = &result.error {
        output.push_str(&format!("\nError: {error}\n"));
    }

    output
}
