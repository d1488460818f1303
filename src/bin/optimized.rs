use anyhow::{Context, Result};
use clap::Parser;
use collatz::{CLIArgs, Optimized};

fn main() -> Result<()> {
    collatz::init_logging();
    let args = CLIArgs::parse();
    collatz::run(&args, Optimized).with_context(|| {
        format!(
            "Failed to find record holders up to {} with the optimized rule.",
            args.bound
        )
    })
}
