//! Error types for the paired BAM to BED12 conversion.

use thiserror::Error;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, PairedBedError>;

/// Fatal conditions raised while converting paired alignments.
///
/// None of these are recoverable: continuing after any of them would produce
/// wrong coordinates, so the driver stops at the first one.
#[derive(Error, Debug)]
pub enum PairedBedError {
    /// A CIGAR operation outside the set the block reducer understands.
    #[error("invalid CIGAR operation '{op}' in record '{name}'")]
    UnrecognizedOperation {
        /// The operation code (SAM character)
        op: char,
        /// Name of the record carrying the operation (empty when unknown)
        name: String,
    },

    /// A CIGAR string that could not be parsed.
    #[error("invalid CIGAR string '{cigar}': {reason}")]
    InvalidCigar {
        /// The offending CIGAR text
        cigar: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Too many distinct properly paired names were buffered without a mate.
    #[error(
        "requires BAM to be sorted/grouped by query name: more than {bound} consecutive \
         properly paired records with different names were seen before halting at '{name}'"
    )]
    UnsortedInput {
        /// Name of the record that overflowed the buffer
        name: String,
        /// The configured buffer bound
        bound: usize,
    },

    /// A pair whose reference id is missing or absent from the header.
    #[error("record '{name}' refers to unknown reference sequence id {id:?}")]
    UnknownReference {
        /// Name of the record
        name: String,
        /// The reference id, if any
        id: Option<usize>,
    },

    /// Failure writing converted output.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PairedBedError {
    /// Attach a record name to an error raised without one.
    pub(crate) fn for_record(self, record_name: &str) -> Self {
        match self {
            Self::UnrecognizedOperation { op, name } if name.is_empty() => {
                Self::UnrecognizedOperation { op, name: record_name.to_string() }
            }
            other => other,
        }
    }
}
