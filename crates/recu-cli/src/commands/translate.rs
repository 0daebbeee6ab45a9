//! Translate command - French/English product-name translation.

use clap::Args;
use recu_core::normalize::translate::{Language, Translator};

/// Arguments for the translate command.
#[derive(Args)]
pub struct TranslateArgs {
    /// Text to translate
    #[arg(required = true)]
    text: String,

    /// Translation direction
    #[arg(short, long, value_enum, default_value = "auto")]
    direction: Direction,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum Direction {
    /// Detect the language and translate to the other
    Auto,
    /// French to English
    FrEn,
    /// English to French
    EnFr,
}

pub fn run(args: TranslateArgs) -> anyhow::Result<()> {
    let translator = Translator::new();

    match args.direction {
        Direction::Auto => match translator.detect_language(&args.text) {
            Language::French => {
                println!("fr -> en: {}", translator.to_english(&args.text));
            }
            Language::English => {
                println!("en -> fr: {}", translator.to_french(&args.text));
            }
            Language::Unknown => {
                println!("Could not determine language");
            }
        },
        Direction::FrEn => println!("fr -> en: {}", translator.to_english(&args.text)),
        Direction::EnFr => println!("en -> fr: {}", translator.to_french(&args.text)),
    }

    let variants = translator.variants(&args.text);
    println!("Variants: {}", variants.join(", "));
    Ok(())
}
