//! Batch command - process multiple OCR-text files.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::Context;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input text files (e.g. "receipts/*.txt")
    #[arg(required = true)]
    pattern: String,

    /// Output file for the JSON result array (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: BatchArgs, context: &Context) -> anyhow::Result<()> {
    let paths: Vec<PathBuf> = glob::glob(&args.pattern)?
        .filter_map(|entry| entry.ok())
        .collect();

    if paths.is_empty() {
        anyhow::bail!("No files match pattern: {}", args.pattern);
    }

    let processor = context.processor();
    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut results = Vec::with_capacity(paths.len());
    for path in &paths {
        pb.set_message(path.display().to_string());
        // A failed document becomes a failed result; siblings keep going.
        let result = match fs::read_to_string(path) {
            Ok(raw_text) => processor.process_text(&raw_text),
            Err(_) => processor.process_text(""),
        };
        results.push(result);
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let output = serde_json::to_string_pretty(&results)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Results written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{output}");
    }

    let stats = processor.stats();
    println!();
    println!(
        "{} {} processed: {} local, {} via AI, {} failed",
        style("ℹ").blue(),
        stats.total_processed,
        stats.local_success,
        stats.ai_fallback,
        stats.failed
    );

    Ok(())
}
