//! Inspect command implementation.

use clap::Parser;

/// Inspect command arguments.
#[derive(Parser)]
pub struct InspectCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,

    /// Number of merges to list
    #[arg(short, long, default_value_t = 20)]
    pub merges: usize,
}

use anyhow::Result as AnyhowResult;
use pairwise_tokenizer::Tokenizer;
use std::path::Path;

pub fn run(cmd: InspectCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(Path::new(&cmd.tokenizer))?;
    let stats = tokenizer.stats();

    println!("Vocabulary size: {}", stats.total);
    println!("  Special tokens: {}", stats.special);
    println!("  Characters: {}", stats.characters);
    println!("  Subwords: {}", stats.subwords);
    println!("Target vocabulary size: {}", tokenizer.target_vocab_size());
    println!("Merge operations: {}", tokenizer.merges().len());

    let shown = cmd.merges.min(tokenizer.merges().len());
    if shown > 0 {
        println!();
        println!("First {} merges:", shown);
        for (i, rule) in tokenizer.merges().iter().take(shown).enumerate() {
            println!(
                "{:3}. ('{}', '{}') -> '{}'",
                i + 1,
                rule.left(),
                rule.right(),
                rule.merged
            );
        }
        let remaining = tokenizer.merges().len() - shown;
        if remaining > 0 {
            println!("... and {} more merges", remaining);
        }
    }

    Ok(())
}
