//! Stats command - learning-system statistics.

use clap::Args;
use console::style;

use super::Context;

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    /// Emit raw JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatsArgs, context: &Context) -> anyhow::Result<()> {
    let stats = context.learner.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", style("Learning statistics").bold());
    println!("  Samples recorded: {}", stats.total_samples);
    println!("  Shops with samples: {}", stats.shops_learned);
    println!(
        "  Average local confidence at capture: {:.2}",
        stats.average_local_confidence
    );
    println!("  Shop templates loaded: {}", context.templates.len());
    Ok(())
}
