use anyhow::Result;
use clap::Parser;
use mimalloc::MiMalloc;
use paired_bed12::{cli, pipeline};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // Standard output carries the BED12 records; diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            if args.quiet {
                EnvFilter::new("warn")
            } else {
                EnvFilter::new("info")
            }
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stats = pipeline::run(&args)?;
    if !args.quiet {
        pipeline::log_summary(&stats, args.min_map_quality);
    }
    Ok(())
}
