//! Train command implementation.

use clap::Parser;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training corpus (UTF-8 text)
    #[arg(short, long)]
    pub input: String,

    /// Output directory for the trained model
    #[arg(short, long)]
    pub output: String,

    /// Target vocabulary size, including special tokens and characters
    #[arg(short, long, default_value_t = 250)]
    pub vocab_size: usize,

    /// Count pairs and apply merges in parallel
    #[arg(short, long, default_value_t = false)]
    pub parallel: bool,

    /// Additional atomic special token (repeatable)
    #[arg(long = "special", value_name = "TOKEN")]
    pub extra_special: Vec<String>,
}

use anyhow::{Context, Result as AnyhowResult};
use log::info;
use pairwise_tokenizer::{SpecialTokens, StopReason, Tokenizer};
use std::path::Path;
use std::time::Instant;

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    info!(
        "Training tokenizer: input={} output={} vocab_size={} parallel={}",
        cmd.input, cmd.output, cmd.vocab_size, cmd.parallel
    );

    let special = cmd
        .extra_special
        .into_iter()
        .fold(SpecialTokens::default(), |special, token| special.with_extra(token));

    let mut tokenizer = Tokenizer::builder()
        .vocab_size(cmd.vocab_size)
        .parallel(cmd.parallel)
        .with_special_tokens(special)
        .build()?;

    // Train
    let start = Instant::now();
    let outcome = tokenizer
        .train_file(Path::new(&cmd.input))
        .with_context(|| format!("training on {}", cmd.input))?;
    println!("Training completed in {:.2}s", start.elapsed().as_secs_f64());
    println!("  Base vocabulary: {}", outcome.base_size);
    println!("  Merges: {}/{}", outcome.merges.len(), outcome.target_merges);
    println!("  Final vocab size: {}", tokenizer.vocab_size());
    if outcome.stop == StopReason::PairsExhausted {
        println!("  Stopped early: no pairs left to merge");
    }
    for (token, count) in &outcome.special_counts {
        println!("  {}: {}", token, count);
    }

    // Save model
    let output_path = Path::new(&cmd.output);
    tokenizer
        .save(output_path)
        .with_context(|| format!("saving tokenizer to {}", cmd.output))?;
    println!("Model saved to {}", cmd.output);

    Ok(())
}
