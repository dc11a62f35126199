//! imerge: merge overlapping integer intervals, in memory or out of core.
//!
//! Usage: imerge <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use imerge::config;
use imerge::error::Result;
use imerge::external::FileMergeCommand;
use imerge::generate::{GenerateCommand, GenerateConfig};
use imerge::merge::merge_text;
use imerge::text::intervals_to_string;

#[derive(Parser)]
#[command(name = "imerge")]
#[command(version)]
#[command(about = "Merge overlapping integer intervals, in memory or out of core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge an interval list passed on the command line
    Text {
        /// Interval list, e.g. "[25,30] [2,19] [14,23] [4,8]"
        list: String,
    },

    /// Merge a file of intervals without loading it wholesale
    File {
        /// Input file containing the interval list
        #[arg(short, long)]
        input: PathBuf,

        /// Chunk size in MiB (overrides IMERGE_CHUNK_MB; default 1)
        #[arg(long)]
        chunk_mb: Option<usize>,

        /// Directory for scratch chunks and the result file
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,
    },

    /// Generate a random interval list for testing
    Generate {
        /// Output file
        #[arg(short, long, default_value = "test_data.txt")]
        output: PathBuf,

        /// Number of interleaved write buffers
        #[arg(long, default_value_t = 30)]
        buffers: usize,

        /// Intervals per buffer
        #[arg(long, default_value_t = 10_000)]
        per_buffer: usize,

        /// RNG seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Text { list } => run_text(&list),

        Commands::File {
            input,
            chunk_mb,
            work_dir,
        } => run_file(input, chunk_mb, work_dir),

        Commands::Generate {
            output,
            buffers,
            per_buffer,
            seed,
        } => run_generate(output, buffers, per_buffer, seed),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_text(list: &str) -> Result<()> {
    let merged = merge_text(list)?;
    if !merged.is_empty() {
        println!("{}", intervals_to_string(&merged));
    }
    Ok(())
}

fn run_file(input: PathBuf, chunk_mb: Option<usize>, work_dir: PathBuf) -> Result<()> {
    // Resolve the budget before touching the input.
    let budget = match chunk_mb {
        Some(mb) => config::budget_from_mb(mb)?,
        None => config::chunk_budget_from_env()?,
    };

    let cmd = FileMergeCommand::new()
        .with_chunk_budget(budget)
        .with_work_dir(work_dir);
    let result = cmd.run(&input)?;

    println!("result written to {}", result.display());
    Ok(())
}

fn run_generate(output: PathBuf, buffers: usize, per_buffer: usize, seed: u64) -> Result<()> {
    let cmd = GenerateCommand::new(GenerateConfig {
        output: output.clone(),
        buffers,
        per_buffer,
        seed,
    });
    let stats = cmd.run()?;

    println!("output written to {}", output.display());
    println!("{}", stats);
    Ok(())
}
