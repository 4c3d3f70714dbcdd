//! paired-bed12: convert properly paired BAM alignments into BED12 intervals.
//!
//! Input must be grouped by query name. Each properly paired mate pair
//! becomes one BED12 line whose blocks cover the aligned bases of both mates;
//! `N` operations (and optionally `D` operations) split blocks.
//!
//! # Library usage
//!
//! ```
//! use paired_bed12::{AlignmentRecord, ConvertConfig, NoDivert, convert, parse_cigar};
//!
//! let refs = vec!["chr1".to_string()];
//! let r1 = AlignmentRecord::new("frag", 100, parse_cigar("50M").unwrap())
//!     .with_first_mate(true)
//!     .with_map_quality(30);
//! let r2 = AlignmentRecord::new("frag", 150, parse_cigar("50M").unwrap())
//!     .with_reverse_strand(true)
//!     .with_map_quality(30);
//!
//! let mut out = Vec::new();
//! let records = vec![r1, r2].into_iter().map(anyhow::Ok);
//! let stats = convert(records, &refs, &ConvertConfig::default(), &mut out, &mut NoDivert).unwrap();
//!
//! assert_eq!(stats.emitted_pairs, 1);
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "chr1\t100\t200\tfrag\t60\t+\t100\t150\t255,0,0\t2\t50,50\t0,50\n"
//! );
//! ```

// Internal modules — not part of the public API.
pub(crate) mod types;

// Public modules — stable API surface.
pub mod bam_input;
pub mod bam_output;
pub mod bed12;
pub mod blocks;
pub mod cli;
pub mod errors;
pub mod pipeline;
pub mod reconcile;
pub mod record;

// Flat re-exports for the most commonly used public types.
pub use bed12::{Bed12Record, build_interval};
pub use blocks::{BlockList, reduce_operations};
pub use errors::PairedBedError;
pub use pipeline::{ConvertConfig, DivertSink, NoDivert, convert};
pub use reconcile::{Action, Diversion, MatePair, PairReconciler, ReconcileConfig, Stats};
pub use record::{AlignmentRecord, CigarOp, OpKind, parse_cigar};
pub use types::{PairScore, RefId};
