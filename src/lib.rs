use std::{
    error,
    fmt::Display,
    io::{self, Write},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

pub mod record;
pub mod rule;

pub use record::{find_record_holders, par_find_record_holders, Record, RecordHolders};
pub use rule::{sequence_length, Naive, Optimized, StepRule};

pub const DEFAULT_BOUND: u64 = 100_000_000;
pub const DEFAULT_CHUNK_SIZE: u64 = 1_000_000;

#[derive(Debug)]
pub enum Error {
    ZeroStart,
    Overflow { start: u64, value: u64 },
    ZeroChunkSize,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ZeroStart => write!(f, "Collatz sequence can't start from 0."),
            Error::Overflow { start, value } => write!(
                f,
                "Sequence starting from {} overflows 64 bits after reaching {}.",
                start, value
            ),
            Error::ZeroChunkSize => write!(f, "Chunk size for parallel scan must be positive."),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    /// Inclusive upper bound of the start numbers to scan.
    #[arg(default_value_t = DEFAULT_BOUND)]
    pub bound: u64,
    /// Scan chunks of the range on a thread pool.
    #[arg(long)]
    pub parallel: bool,
    /// Start numbers per chunk in a parallel scan.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u64,
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

/// Print every record holder in `1..=args.bound` under `rule` to stdout.
pub fn run<R>(args: &CLIArgs, rule: R) -> Result<()>
where
    R: StepRule + Clone + Send + Sync,
{
    info!(
        bound = args.bound,
        rule = R::NAME,
        parallel = args.parallel,
        "Scanning for record holders"
    );
    let start_time = Instant::now();
    let mut stdout = io::stdout().lock();
    if args.parallel {
        let records = par_find_record_holders(args.bound, rule, args.chunk_size)
            .with_context(|| {
                format!(
                    "Failed to scan 1..={} in chunks of {}.",
                    args.bound, args.chunk_size
                )
            })?;
        for record in records {
            writeln!(stdout, "{}", record).context("Failed to write record.")?;
        }
    } else {
        for record in find_record_holders(args.bound, rule) {
            let record =
                record.with_context(|| format!("Failed to scan 1..={}.", args.bound))?;
            debug!(number = record.number, steps = record.steps, "New record");
            writeln!(stdout, "{}", record).context("Failed to write record.")?;
            stdout.flush().context("Failed to flush stdout.")?;
        }
    }
    info!(elapsed = ?start_time.elapsed(), "Scan finished");

    Ok(())
}
