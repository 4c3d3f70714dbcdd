//! Reduce CIGAR operations to BED12 blocks.
//!
//! Block starts are offsets relative to the leftmost position of the pair,
//! so the caller threads one running cursor through both mates and the
//! blocks of the two records land in the same coordinate space.
use crate::errors::{PairedBedError, Result};
use crate::record::{CigarOp, OpKind};

/// Parallel block start / block length vectors for one BED12 entry.
///
/// `starts` may run one entry ahead of `lengths` while a record is being
/// reduced: a start is pushed when a gap closes the previous block, and the
/// matching length is pushed when the next block closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    pub starts: Vec<u32>,
    pub lengths: Vec<u32>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new block at `offset`.
    pub fn push_start(&mut self, offset: u32) {
        self.starts.push(offset);
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Walk `ops` from `cursor`, appending block boundaries to `blocks`.
///
/// Returns the cursor after the last reference-consuming operation. `N`
/// always closes the current block; `D` closes it only when
/// `split_on_deletion` is set and is otherwise folded into the block. A
/// closing gap as the final operation leaves a zero-length trailing block.
/// `=` and `X` are rejected with [`PairedBedError::UnrecognizedOperation`].
pub fn reduce_operations(
    ops: &[CigarOp],
    mut cursor: u32,
    split_on_deletion: bool,
    blocks: &mut BlockList,
) -> Result<u32> {
    let mut block_len: u32 = 0;

    for op in ops {
        match op.kind {
            OpKind::Match => {
                block_len = block_len.saturating_add(op.len);
                cursor = cursor.saturating_add(op.len);
            }
            OpKind::Insertion | OpKind::SoftClip | OpKind::Pad | OpKind::HardClip => {}
            OpKind::Deletion if !split_on_deletion => {
                block_len = block_len.saturating_add(op.len);
                cursor = cursor.saturating_add(op.len);
            }
            OpKind::Deletion | OpKind::Skip => {
                blocks.starts.push(cursor.saturating_add(op.len));
                blocks.lengths.push(block_len);
                cursor = cursor.saturating_add(op.len);
                block_len = 0;
            }
            OpKind::SequenceMatch | OpKind::SequenceMismatch => {
                return Err(PairedBedError::UnrecognizedOperation {
                    op: op.kind.code(),
                    name: String::new(),
                });
            }
        }
    }

    blocks.lengths.push(block_len);
    Ok(cursor)
}
