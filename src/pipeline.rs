use crate::bam_input::{self, BamAlignment};
use crate::bam_output;
use crate::bed12::{self, DEFAULT_COLOR};
use crate::cli::Args;
use crate::reconcile::{
    Action, DEFAULT_MAX_PENDING, Diversion, MatePair, PairReconciler, ReconcileConfig, Stats,
};
use crate::record::AlignmentRecord;
use crate::types::PairScore;
use anyhow::Result;
use std::io::{self, BufWriter, Write};

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub min_map_quality: PairScore,
    /// Treat `D` operations like `N`: close the current block.
    pub split_on_deletion: bool,
    pub color: String,
    pub max_pending: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            min_map_quality: 0,
            split_on_deletion: false,
            color: DEFAULT_COLOR.to_string(),
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}

impl ConvertConfig {
    fn reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig {
            min_map_quality: self.min_map_quality,
            max_pending: self.max_pending,
        }
    }
}

impl From<&Args> for ConvertConfig {
    fn from(args: &Args) -> Self {
        Self {
            min_map_quality: args.min_map_quality,
            split_on_deletion: args.split_on_deletion,
            color: args.color.clone(),
            max_pending: args.max_pending,
        }
    }
}

/// Destination for records that are not converted.
pub trait DivertSink<T> {
    fn divert(&mut self, record: &T) -> Result<()>;
}

/// Discards diverted records.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDivert;

impl<T> DivertSink<T> for NoDivert {
    fn divert(&mut self, _record: &T) -> Result<()> {
        Ok(())
    }
}

impl<T: Clone> DivertSink<T> for Vec<T> {
    fn divert(&mut self, record: &T) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

fn divert_pair<T, S>(sink: &mut S, pair: &MatePair<T>) -> Result<()>
where
    S: DivertSink<T> + ?Sized,
{
    sink.divert(&pair.first)?;
    sink.divert(&pair.second)
}

fn divert_all<T, S>(sink: &mut S, records: &[T]) -> Result<()>
where
    S: DivertSink<T> + ?Sized,
{
    for record in records {
        sink.divert(record)?;
    }
    Ok(())
}

/// Convert a name-grouped record stream into BED12 lines on `out`.
///
/// Each passing pair is written as soon as its second mate is read, so the
/// output order follows the input order of second mates. Diverted records go
/// to `sink` in the order they are resolved.
pub fn convert<T, I, W, S>(
    records: I,
    reference_names: &[String],
    config: &ConvertConfig,
    out: W,
    sink: &mut S,
) -> Result<Stats>
where
    T: AsRef<AlignmentRecord>,
    I: IntoIterator<Item = Result<T>>,
    W: Write,
    S: DivertSink<T> + ?Sized,
{
    let mut out = BufWriter::new(out);
    let mut reconciler: PairReconciler<T> = PairReconciler::new(config.reconcile_config());

    for result in records {
        let record = result?;
        match reconciler.process_record(record)? {
            Action::Buffered => {}
            Action::Emit { pair, unmatched } => {
                let interval = bed12::build_interval(
                    pair.first.as_ref(),
                    pair.second.as_ref(),
                    reference_names,
                    config.split_on_deletion,
                    &config.color,
                )?;
                writeln!(out, "{interval}")?;
                divert_all(sink, &unmatched)?;
            }
            Action::Diverted(Diversion::NotProperPair(record)) => {
                sink.divert(&record)?;
            }
            Action::Diverted(Diversion::BelowQualityThreshold { pair, unmatched }) => {
                divert_pair(sink, &pair)?;
                divert_all(sink, &unmatched)?;
            }
        }
    }

    out.flush()?;
    Ok(reconciler.finish())
}

fn decode_record(result: io::Result<noodles::bam::Record>) -> Result<BamAlignment> {
    Ok(BamAlignment::new(result?)?)
}

/// Convert the BAM named by `args` to BED12 on standard output.
pub fn run(args: &Args) -> Result<Stats> {
    let config = ConvertConfig::from(args);
    let mut bam = bam_input::open_bam(&args.input)?;
    let stdout = io::stdout().lock();

    let stats = match &args.unprocessed_bam {
        Some(path) => {
            let mut diverted = bam_output::DivertedBam::create(path, &bam.header)?;
            let records = bam.reader.records().map(decode_record);
            let stats = convert(records, &bam.reference_names, &config, stdout, &mut diverted)?;
            let written = diverted.finish()?;
            tracing::debug!(written, path = %path.display(), "wrote unprocessed alignments");
            stats
        }
        None => {
            let records = bam.reader.records().map(decode_record);
            convert(records, &bam.reference_names, &config, stdout, &mut NoDivert)?
        }
    };

    Ok(stats)
}

/// Log how many alignments were converted, skipped, or filtered.
pub fn log_summary(stats: &Stats, min_map_quality: PairScore) {
    let total = stats.total_records();
    let resolved = stats.resolved_pairs();
    tracing::info!(
        "processed {} BAM alignments producing {} BED12 entries",
        total,
        stats.emitted_pairs
    );
    tracing::info!(
        "{} ({}%) were not 'properly paired' BAM alignments",
        stats.not_proper_pair,
        Stats::percent(stats.not_proper_pair, total)
    );
    tracing::info!(
        "{} ({}%) were not 'paired in name' and were thus skipped",
        stats.unmatched_in_name,
        Stats::percent(stats.unmatched_in_name, total)
    );
    tracing::info!(
        "{} BED12 were produced out of which {} ({}%) were excluded because their combined MapQ was below {}",
        resolved,
        stats.below_quality_pairs,
        Stats::percent(stats.below_quality_pairs, resolved),
        min_map_quality
    );
    if stats.residual_at_end > 0 {
        tracing::info!(
            "{} properly paired alignments were still unmatched at the end of the input",
            stats.residual_at_end
        );
    }
}
