use clap::Parser;

/// Walk the poll registry through its operations and print each outcome.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of concurrent voters spawned for the contention demonstration.
    #[arg(long, default_value_t = 8)]
    pub voters: usize,
}
