//! Alignment records as seen by the pair reconciler.
//!
//! `AlignmentRecord` carries only the fields the conversion needs: name,
//! placement, mapping quality, three flags, and the CIGAR operations.
use crate::errors::{PairedBedError, Result};
use crate::types::RefId;
use noodles::bam;
use noodles::sam::alignment::record::cigar::op::Kind as SamCigarKind;
use std::fmt;

/// SAM CIGAR operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Match,
    Insertion,
    Deletion,
    Skip,
    SoftClip,
    HardClip,
    Pad,
    SequenceMatch,
    SequenceMismatch,
}

impl OpKind {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(Self::Match),
            'I' => Some(Self::Insertion),
            'D' => Some(Self::Deletion),
            'N' => Some(Self::Skip),
            'S' => Some(Self::SoftClip),
            'H' => Some(Self::HardClip),
            'P' => Some(Self::Pad),
            '=' => Some(Self::SequenceMatch),
            'X' => Some(Self::SequenceMismatch),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Match => 'M',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
            Self::Skip => 'N',
            Self::SoftClip => 'S',
            Self::HardClip => 'H',
            Self::Pad => 'P',
            Self::SequenceMatch => '=',
            Self::SequenceMismatch => 'X',
        }
    }
}

impl From<SamCigarKind> for OpKind {
    fn from(kind: SamCigarKind) -> Self {
        match kind {
            SamCigarKind::Match => Self::Match,
            SamCigarKind::Insertion => Self::Insertion,
            SamCigarKind::Deletion => Self::Deletion,
            SamCigarKind::Skip => Self::Skip,
            SamCigarKind::SoftClip => Self::SoftClip,
            SamCigarKind::HardClip => Self::HardClip,
            SamCigarKind::Pad => Self::Pad,
            SamCigarKind::SequenceMatch => Self::SequenceMatch,
            SamCigarKind::SequenceMismatch => Self::SequenceMismatch,
        }
    }
}

/// One run-length encoded CIGAR operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub kind: OpKind,
    pub len: u32,
}

impl CigarOp {
    pub fn new(kind: OpKind, len: u32) -> Self {
        Self { kind, len }
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.kind.code())
    }
}

/// Parse a SAM CIGAR string such as `50M10N50M`.
///
/// `*` and the empty string are both the empty operation list.
pub fn parse_cigar(cigar: &str) -> Result<Vec<CigarOp>> {
    let invalid = |reason: &str| PairedBedError::InvalidCigar {
        cigar: cigar.to_string(),
        reason: reason.to_string(),
    };

    if cigar.is_empty() || cigar == "*" {
        return Ok(Vec::new());
    }

    let mut ops = Vec::new();
    let mut len: Option<u32> = None;
    for ch in cigar.chars() {
        if let Some(digit) = ch.to_digit(10) {
            let acc = len.unwrap_or(0);
            let next = acc
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| invalid("operation length overflows u32"))?;
            len = Some(next);
            continue;
        }

        let kind = OpKind::from_code(ch).ok_or_else(|| PairedBedError::UnrecognizedOperation {
            op: ch,
            name: String::new(),
        })?;
        match len.take() {
            Some(0) => return Err(invalid("zero-length operation")),
            Some(n) => ops.push(CigarOp::new(kind, n)),
            None => return Err(invalid("operation without a length")),
        }
    }

    if len.is_some() {
        return Err(invalid("trailing length without an operation"));
    }

    Ok(ops)
}

/// The fields of one BAM record that pairing and block reduction depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    pub name: String,
    /// `None` when the record is unplaced.
    pub reference_id: Option<RefId>,
    /// 0-based leftmost aligned reference position.
    pub position: u32,
    pub map_quality: u8,
    pub is_first_mate: bool,
    pub is_reverse_strand: bool,
    pub is_proper_pair: bool,
    pub operations: Vec<CigarOp>,
}

impl AlignmentRecord {
    /// A forward-strand, properly paired record on reference 0 with MAPQ 0.
    ///
    /// The `with_*` methods adjust the remaining fields.
    pub fn new(name: impl Into<String>, position: u32, operations: Vec<CigarOp>) -> Self {
        Self {
            name: name.into(),
            reference_id: Some(0),
            position,
            map_quality: 0,
            is_first_mate: false,
            is_reverse_strand: false,
            is_proper_pair: true,
            operations,
        }
    }

    pub fn with_reference_id(mut self, reference_id: Option<RefId>) -> Self {
        self.reference_id = reference_id;
        self
    }

    pub fn with_map_quality(mut self, map_quality: u8) -> Self {
        self.map_quality = map_quality;
        self
    }

    pub fn with_first_mate(mut self, is_first_mate: bool) -> Self {
        self.is_first_mate = is_first_mate;
        self
    }

    pub fn with_reverse_strand(mut self, is_reverse_strand: bool) -> Self {
        self.is_reverse_strand = is_reverse_strand;
        self
    }

    pub fn with_proper_pair(mut self, is_proper_pair: bool) -> Self {
        self.is_proper_pair = is_proper_pair;
        self
    }

    /// Extract the pairing fields from a raw BAM record.
    ///
    /// A missing mapping quality reads as 255 and a missing alignment start
    /// as position 0, matching how BAM encodes those values on disk.
    pub fn from_bam(record: &bam::Record) -> Result<Self> {
        let flags = record.flags();
        let name = record.name().map(|n| n.to_string()).unwrap_or_default();
        let reference_id = record.reference_sequence_id().transpose()?;
        let position = match record.alignment_start().transpose()? {
            Some(pos) => (pos.get() - 1) as u32,
            None => 0,
        };
        let map_quality = record.mapping_quality().map(u8::from).unwrap_or(255);

        let mut operations = Vec::new();
        for result in record.cigar().iter() {
            let op = result?;
            operations.push(CigarOp::new(op.kind().into(), op.len() as u32));
        }

        Ok(Self {
            name,
            reference_id,
            position,
            map_quality,
            is_first_mate: flags.is_first_segment(),
            is_reverse_strand: flags.is_reverse_complemented(),
            is_proper_pair: flags.is_properly_segmented(),
            operations,
        })
    }
}

impl AsRef<AlignmentRecord> for AlignmentRecord {
    fn as_ref(&self) -> &AlignmentRecord {
        self
    }
}
