//! BED12 intervals built from a resolved mate pair.
use crate::blocks::{BlockList, reduce_operations};
use crate::errors::{PairedBedError, Result};
use crate::record::AlignmentRecord;
use crate::types::PairScore;
use std::fmt;

pub const DEFAULT_COLOR: &str = "255,0,0";

/// One BED12 line covering both mates of a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bed12Record {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub name: String,
    pub score: PairScore,
    pub strand: char,
    /// Extent of the first-in-sequencing (5') mate.
    pub thick_start: u32,
    pub thick_end: u32,
    pub color: String,
    pub block_lengths: Vec<u32>,
    /// Offsets relative to `start`.
    pub block_starts: Vec<u32>,
}

impl Bed12Record {
    pub fn block_count(&self) -> usize {
        self.block_starts.len()
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[u32]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for Bed12Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t",
            self.chrom,
            self.start,
            self.end,
            self.name,
            self.score,
            self.strand,
            self.thick_start,
            self.thick_end,
            self.color,
            self.block_count(),
        )?;
        write_joined(f, &self.block_lengths)?;
        f.write_str("\t")?;
        write_joined(f, &self.block_starts)
    }
}

/// Combine two position-ordered mates into one BED12 interval.
///
/// `first` must not start after `second`. The strand and thick range come
/// from whichever mate is read 1, regardless of genomic order.
pub fn build_interval(
    first: &AlignmentRecord,
    second: &AlignmentRecord,
    reference_names: &[String],
    split_on_deletion: bool,
    color: &str,
) -> Result<Bed12Record> {
    let chrom = first
        .reference_id
        .and_then(|id| reference_names.get(id))
        .ok_or_else(|| PairedBedError::UnknownReference {
            name: first.name.clone(),
            id: first.reference_id,
        })?;

    let reverse = if first.is_first_mate {
        first.is_reverse_strand
    } else {
        second.is_reverse_strand
    };
    let strand = if reverse { '-' } else { '+' };

    let mut blocks = BlockList::new();
    blocks.push_start(0);
    let first_end = reduce_operations(&first.operations, 0, split_on_deletion, &mut blocks)
        .map_err(|e| e.for_record(&first.name))?;

    let second_offset = second.position.saturating_sub(first.position);
    blocks.push_start(second_offset);
    let second_end =
        reduce_operations(&second.operations, second_offset, split_on_deletion, &mut blocks)
            .map_err(|e| e.for_record(&second.name))?;

    let start = first.position;
    let end = start.saturating_add(second_end);
    let (thick_start, thick_end) = if first.is_first_mate {
        (first.position, first.position.saturating_add(first_end))
    } else {
        (second.position, end)
    };

    Ok(Bed12Record {
        chrom: chrom.clone(),
        start,
        end,
        name: first.name.clone(),
        score: PairScore::from(first.map_quality) + PairScore::from(second.map_quality),
        strand,
        thick_start,
        thick_end,
        color: color.to_string(),
        block_lengths: blocks.lengths,
        block_starts: blocks.starts,
    })
}
