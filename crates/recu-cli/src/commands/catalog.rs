//! Catalog commands - search, learn mappings, add products.

use clap::Args;
use console::style;

use super::Context;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    #[arg(required = true)]
    query: String,

    /// Maximum number of results
    #[arg(short, long, default_value = "10")]
    limit: usize,
}

pub fn run_search(args: SearchArgs, context: &Context) -> anyhow::Result<()> {
    let hits = context.normalizer.search_products(&args.query, args.limit);

    if hits.is_empty() {
        println!("{} No matches for '{}'", style("✗").red(), args.query);
        return Ok(());
    }

    println!("Found {} matches:\n", hits.len());
    for (index, hit) in hits.iter().enumerate() {
        println!(
            "{}. {} (score: {:.3})",
            index + 1,
            hit.product.normalized_name,
            hit.match_score
        );
        println!("   ID: {}", hit.product.product_id);
        println!("   Category: {}", hit.product.category);
        println!("   Unit: {}", hit.product.unit_of_measure);
    }
    Ok(())
}

/// Arguments for the learn command.
#[derive(Args)]
pub struct LearnArgs {
    /// Raw product name as printed on receipts
    #[arg(required = true)]
    raw_name: String,

    /// Target product id (e.g. PROD_001)
    #[arg(required = true)]
    product_id: String,

    /// Restrict the mapping to one shop
    #[arg(short, long)]
    shop: Option<String>,
}

pub fn run_learn(args: LearnArgs, context: &Context) -> anyhow::Result<()> {
    context
        .normalizer
        .learn_mapping(&args.raw_name, &args.product_id, args.shop.as_deref())?;
    println!(
        "{} Learned mapping '{}' -> {}",
        style("✓").green(),
        args.raw_name,
        args.product_id
    );

    // Verify the mapping resolves.
    let result = context.normalizer.normalize(&args.raw_name, args.shop.as_deref());
    super::normalize::print_result(&args.raw_name, &result);
    Ok(())
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Canonical product name
    #[arg(required = true)]
    name: String,

    /// Product category
    #[arg(required = true)]
    category: String,

    /// Unit of measure
    #[arg(short, long, default_value = "piece")]
    unit: String,

    /// Comma-separated French aliases
    #[arg(long)]
    fr: Option<String>,

    /// Comma-separated English aliases
    #[arg(long)]
    en: Option<String>,
}

pub fn run_add(args: AddArgs, context: &Context) -> anyhow::Result<()> {
    let split = |aliases: Option<String>| -> Vec<String> {
        aliases
            .map(|list| {
                list.split(',')
                    .map(|alias| alias.trim().to_string())
                    .filter(|alias| !alias.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    };

    let product_id = context.normalizer.add_product(
        &args.name,
        &args.category,
        &args.unit,
        split(args.fr),
        split(args.en),
    )?;

    println!(
        "{} Added product {} ({})",
        style("✓").green(),
        args.name,
        product_id
    );
    Ok(())
}
