//! Decode command implementation.

use clap::Parser;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,

    /// Token IDs to decode (comma or whitespace separated)
    #[arg(long)]
    pub ids: String,
}

use anyhow::{Context, Result as AnyhowResult};
use pairwise_tokenizer::Tokenizer;
use std::path::Path;

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    // Load tokenizer
    let tokenizer_path = Path::new(&cmd.tokenizer);
    let tokenizer = Tokenizer::load(tokenizer_path)?;

    let ids = parse_ids(&cmd.ids)?;
    println!("{}", tokenizer.decode_ids(&ids));

    Ok(())
}

fn parse_ids(input: &str) -> AnyhowResult<Vec<u32>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("invalid token id {s:?}"))
        })
        .collect()
}
