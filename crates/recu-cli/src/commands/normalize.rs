//! Normalize command - resolve one product name against the catalog.

use clap::Args;
use console::style;
use recu_core::NormalizationResult;

use super::Context;

/// Arguments for the normalize command.
#[derive(Args)]
pub struct NormalizeArgs {
    /// Product name to normalize
    #[arg(required = true)]
    name: String,

    /// Shop id for shop-scoped learned mappings
    #[arg(short, long)]
    shop: Option<String>,

    /// Emit the raw JSON result instead of the summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: NormalizeArgs, context: &Context) -> anyhow::Result<()> {
    let result = context.normalizer.normalize(&args.name, args.shop.as_deref());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_result(&args.name, &result);
    Ok(())
}

pub fn print_result(input: &str, result: &NormalizationResult) {
    match &result.product_id {
        Some(product_id) => println!(
            "{} '{}' -> {} ({})",
            style("✓").green(),
            input,
            result.normalized_name,
            product_id
        ),
        None => println!("{} '{}' -> no match", style("✗").red(), input),
    }

    println!(
        "  Confidence: {:.3} ({:.1}%)",
        result.confidence,
        result.confidence * 100.0
    );
    println!("  Method: {}", result.match_method.as_str());
    if let Some(category) = &result.category {
        println!("  Category: {category}");
    }
    println!(
        "  Needs review: {}",
        if result.needs_review { "yes" } else { "no" }
    );

    if !result.suggestions.is_empty() {
        println!("  Suggestions:");
        for (index, suggestion) in result.suggestions.iter().enumerate() {
            println!(
                "    {}. {} (score: {:.3})",
                index + 1,
                suggestion.normalized_name,
                suggestion.score
            );
        }
    }
}
