use crate::bam_input::BamAlignment;
use crate::pipeline::DivertSink;
use anyhow::{Context, Result};
use noodles::{bam, sam};
use std::fs::File;
use std::path::Path;

/// BAM file receiving diverted alignments, unmodified, under the input header.
pub struct DivertedBam {
    header: sam::Header,
    writer: Box<dyn sam::alignment::io::Write>,
    written: u64,
}

impl DivertedBam {
    /// Create `path` and write `header` to it.
    pub fn create(path: &Path, header: &sam::Header) -> Result<Self> {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = bam::io::Writer::new(file);
        writer.write_header(header)?;
        Ok(Self {
            header: header.clone(),
            writer: Box::new(writer),
            written: 0,
        })
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and write the BGZF end-of-file marker.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.finish(&self.header)?;
        Ok(self.written)
    }
}

impl DivertSink<BamAlignment> for DivertedBam {
    fn divert(&mut self, record: &BamAlignment) -> Result<()> {
        self.writer
            .write_alignment_record(&self.header, &record.record)?;
        self.written += 1;
        Ok(())
    }
}
