//! Pairwise CLI - Command-line interface for the classic BPE tokenizer.
//!
//! This is the main entry point for the `pairwise` command-line tool.
//! Library progress is reported through `log`; set `RUST_LOG=debug` to see
//! every merge.

mod commands;

use clap::{Parser, Subcommand};
use commands::{DecodeCommand, EncodeCommand, InspectCommand, TrainCommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "pairwise")]
#[command(about = "A classic BPE tokenizer with end-of-word markers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new tokenizer from a text corpus
    Train(TrainCommand),
    /// Encode text to tokens or token IDs
    Encode(EncodeCommand),
    /// Decode token IDs back to text
    Decode(DecodeCommand),
    /// Show vocabulary statistics and learned merges
    Inspect(InspectCommand),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(cmd) => commands::train::run(cmd)?,
        Commands::Encode(cmd) => commands::encode::run(cmd)?,
        Commands::Decode(cmd) => commands::decode::run(cmd)?,
        Commands::Inspect(cmd) => commands::inspect::run(cmd)?,
    }

    Ok(())
}
