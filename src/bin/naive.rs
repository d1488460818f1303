use anyhow::{Context, Result};
use clap::Parser;
use collatz::{CLIArgs, Naive};

fn main() -> Result<()> {
    collatz::init_logging();
    let args = CLIArgs::parse();
    collatz::run(&args, Naive).with_context(|| {
        format!(
            "Failed to find record holders up to {} with the naive rule.",
            args.bound
        )
    })
}
