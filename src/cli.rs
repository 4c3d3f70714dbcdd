use crate::bed12::DEFAULT_COLOR;
use crate::reconcile::DEFAULT_MAX_PENDING;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "paired-bed12",
    about = "Convert 'properly paired' BAM alignments to BED12",
    long_about = "Convert 'properly paired' BAM alignments to BED12.\n\n\
        Typically produces a 2-block BED12 entry for each properly paired BAM pair. \
        Additional blocks are produced when an alignment contains a long deletion (CIGAR N-op). \
        The BAM input must be grouped/sorted by query name, not alignment position.",
    version
)]
pub struct Args {
    /// Input BAM grouped by query name ("stdin" or "-" reads standard input)
    #[arg(short = 'i', long = "input", value_name = "BAM", default_value = "stdin")]
    pub input: String,

    /// Do not log the summary of processed alignments; set logging level to WARN
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Start a new block at short deletions from the reference (CIGAR D-op)
    #[arg(short = 'd', long = "dblock")]
    pub split_on_deletion: bool,

    /// R,G,B color for the BED12 itemRgb field
    #[arg(short = 'c', long, value_name = "R,G,B", default_value = DEFAULT_COLOR)]
    pub color: String,

    /// Minimum (inclusive) MAPQ sum of both mates for reporting a pair
    #[arg(short = 'Q', long = "qual", value_name = "INT", default_value_t = 0)]
    pub min_map_quality: u32,

    /// Write unprocessed alignments (not properly paired, low quality, unpaired in name) to this BAM
    #[arg(
        short = 'x',
        long = "unprocessed",
        value_name = "BAM",
        num_args = 0..=1,
        default_missing_value = "unprocessedPair.bam"
    )]
    pub unprocessed_bam: Option<PathBuf>,

    /// Maximum consecutive unmatched properly paired names before halting
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_PENDING)]
    pub max_pending: usize,
}
