use crate::errors::PairedBedError;
use crate::record::AlignmentRecord;
use anyhow::{Context, Result};
use noodles::{bam, sam};
use std::fs::File;
use std::io::{self, Read};

pub struct BamInput<R> {
    pub header: sam::Header,
    /// Reference sequence names indexed by reference id.
    pub reference_names: Vec<String>,
    pub reader: bam::io::Reader<R>,
}

/// A decoded BAM record together with the raw record it came from.
///
/// The raw record is what gets written when the alignment is diverted.
#[derive(Debug, Clone)]
pub struct BamAlignment {
    pub alignment: AlignmentRecord,
    pub record: bam::Record,
}

impl BamAlignment {
    pub fn new(record: bam::Record) -> Result<Self, PairedBedError> {
        let alignment = AlignmentRecord::from_bam(&record)?;
        Ok(Self { alignment, record })
    }
}

impl AsRef<AlignmentRecord> for BamAlignment {
    fn as_ref(&self) -> &AlignmentRecord {
        &self.alignment
    }
}

/// Open a BAM from a path, or from standard input for `stdin` / `-`.
pub fn open_bam(input: &str) -> Result<BamInput<impl Read + use<>>> {
    let inner: Box<dyn Read> = if input == "stdin" || input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input).with_context(|| format!("failed to open BAM {input}"))?;
        Box::new(file)
    };

    let mut reader = bam::io::Reader::new(inner);
    let header = reader
        .read_header()
        .with_context(|| format!("failed to read BAM header from {input}"))?;
    let reference_names = header
        .reference_sequences()
        .keys()
        .map(|name| name.to_string())
        .collect();

    Ok(BamInput { header, reference_names, reader })
}
