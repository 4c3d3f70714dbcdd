//! Streaming reconciliation of properly paired mates.
//!
//! Input is assumed grouped by query name. The reconciler keeps at most one
//! record per unseen name; when the second mate of a name arrives the pair is
//! resolved and everything else still buffered is handed back as residue.
use crate::errors::{PairedBedError, Result};
use crate::record::AlignmentRecord;
use crate::types::{HashMap, HashMapExt, PairScore};

/// Default bound on buffered, still unmatched proper-pair records.
pub const DEFAULT_MAX_PENDING: usize = 1000;

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Minimum (inclusive) sum of both mates' MAPQ for a pair to be emitted.
    pub min_map_quality: PairScore,
    /// Buffer bound; exceeding it means the input is not grouped by name.
    pub max_pending: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            min_map_quality: 0,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}

/// Two mates ordered by alignment position, with their combined MAPQ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatePair<T> {
    pub first: T,
    pub second: T,
    pub score: PairScore,
}

/// Outcome of feeding one record to [`PairReconciler::process_record`].
#[derive(Debug, PartialEq, Eq)]
pub enum Action<T> {
    /// First mate of a name; held until its partner arrives.
    Buffered,
    /// A completed pair passing the quality threshold.
    ///
    /// `unmatched` holds proper-pair records of other names that were still
    /// buffered, sorted by name.
    Emit { pair: MatePair<T>, unmatched: Vec<T> },
    Diverted(Diversion<T>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Diversion<T> {
    NotProperPair(T),
    BelowQualityThreshold { pair: MatePair<T>, unmatched: Vec<T> },
}

/// Running counts of how records were routed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub not_proper_pair: u64,
    pub unmatched_in_name: u64,
    pub below_quality_pairs: u64,
    pub emitted_pairs: u64,
    /// Proper-pair records still buffered when the input ended.
    pub residual_at_end: u64,
}

impl Stats {
    /// Records accounted for by the routing counters.
    ///
    /// Residue left at end of input is not included.
    pub fn total_records(&self) -> u64 {
        self.not_proper_pair
            + self.unmatched_in_name
            + 2 * self.below_quality_pairs
            + 2 * self.emitted_pairs
    }

    /// Pairs whose second mate was seen, whether emitted or not.
    pub fn resolved_pairs(&self) -> u64 {
        self.below_quality_pairs + self.emitted_pairs
    }

    /// Integer percentage of `part` in `whole`, 0 when `whole` is 0.
    pub fn percent(part: u64, whole: u64) -> u64 {
        if whole == 0 { 0 } else { 100 * part / whole }
    }
}

/// Pairs up proper-pair records from a name-grouped stream.
pub struct PairReconciler<T> {
    config: ReconcileConfig,
    pending: HashMap<String, T>,
    stats: Stats,
}

impl<T: AsRef<AlignmentRecord>> PairReconciler<T> {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            pending: HashMap::new(),
            stats: Stats::default(),
        }
    }

    pub fn process_record(&mut self, record: T) -> Result<Action<T>> {
        let aln = record.as_ref();
        if !aln.is_proper_pair {
            self.stats.not_proper_pair += 1;
            return Ok(Action::Diverted(Diversion::NotProperPair(record)));
        }

        let name = aln.name.clone();
        let Some(mate) = self.pending.remove(&name) else {
            self.pending.insert(name.clone(), record);
            if self.pending.len() > self.config.max_pending {
                return Err(PairedBedError::UnsortedInput {
                    name,
                    bound: self.config.max_pending,
                });
            }
            return Ok(Action::Buffered);
        };

        // Ties keep the buffered mate first.
        let (first, second) = if record.as_ref().position < mate.as_ref().position {
            (record, mate)
        } else {
            (mate, record)
        };
        let score =
            PairScore::from(first.as_ref().map_quality) + PairScore::from(second.as_ref().map_quality);
        let pair = MatePair { first, second, score };

        let mut unmatched: Vec<T> = self.pending.drain().map(|(_, rec)| rec).collect();
        unmatched.sort_by(|a, b| a.as_ref().name.cmp(&b.as_ref().name));
        if !unmatched.is_empty() {
            tracing::debug!(
                name = %name,
                unmatched = unmatched.len(),
                "dropping buffered records not paired in name"
            );
        }
        self.stats.unmatched_in_name += unmatched.len() as u64;

        if score < self.config.min_map_quality {
            self.stats.below_quality_pairs += 1;
            Ok(Action::Diverted(Diversion::BelowQualityThreshold { pair, unmatched }))
        } else {
            self.stats.emitted_pairs += 1;
            Ok(Action::Emit { pair, unmatched })
        }
    }

    /// Number of records currently waiting for a mate.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// End of input: drop whatever is still buffered and return the counts.
    pub fn finish(mut self) -> Stats {
        let residual = self.pending.len();
        if residual > 0 {
            tracing::debug!(residual, "input ended with unmatched properly paired records");
        }
        self.stats.residual_at_end = residual as u64;
        self.stats
    }
}
