use crate::alignment::{self, AlignmentRecord};
use crate::fasta::ReadLengths;
use anyhow::{Context, Result, anyhow, bail};
use noodles::{bam, sam};
use sam::alignment::RecordBuf;
use std::io;
use std::path::Path;

type ReadFn = Box<dyn FnMut(&mut RecordBuf) -> io::Result<usize>>;

/// Counters kept while streaming one alignment file.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputCounts {
    pub total_records: u64,
    pub unmapped_records: u64,
}

/// Streams mapped records of a SAM or BAM file as `AlignmentRecord`s.
pub struct AlignmentInput<'a> {
    read_next: ReadFn,
    contigs: Vec<String>,
    lengths: Option<&'a ReadLengths>,
    record: RecordBuf,
    pub counts: InputCounts,
}

pub fn open_alignments<'a>(
    path: &Path,
    lengths: Option<&'a ReadLengths>,
) -> Result<AlignmentInput<'a>> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (header, read_next): (sam::Header, ReadFn) = match ext.as_str() {
        "bam" => {
            let mut reader = bam::io::reader::Builder::default()
                .build_from_path(path)
                .with_context(|| format!("failed to open BAM {}", path.display()))?;
            let header = reader.read_header()?;
            let h = header.clone();
            let read_next: ReadFn =
                Box::new(move |rec: &mut RecordBuf| reader.read_record_buf(&h, rec));
            (header, read_next)
        }
        "sam" => {
            let mut reader = sam::io::reader::Builder::default()
                .build_from_path(path)
                .with_context(|| format!("failed to open SAM {}", path.display()))?;
            let header = reader.read_header()?;
            let h = header.clone();
            let read_next: ReadFn =
                Box::new(move |rec: &mut RecordBuf| reader.read_record_buf(&h, rec));
            (header, read_next)
        }
        _ => bail!(
            "unable to detect alignment format from extension: .{}",
            ext
        ),
    };

    let contigs = header
        .reference_sequences()
        .keys()
        .map(|name| name.to_string())
        .collect();

    Ok(AlignmentInput {
        read_next,
        contigs,
        lengths,
        record: RecordBuf::default(),
        counts: InputCounts::default(),
    })
}

impl AlignmentInput<'_> {
    fn convert(&self) -> Result<Option<AlignmentRecord>> {
        let record = &self.record;
        let flags = record.flags();
        let (Some(ref_id), Some(pos)) = (record.reference_sequence_id(), record.alignment_start())
        else {
            return Ok(None);
        };
        if flags.is_unmapped() {
            return Ok(None);
        }

        let read_id = record.name().map(|n| n.to_string()).unwrap_or_default();
        let contig = self
            .contigs
            .get(ref_id)
            .ok_or_else(|| anyhow!("invalid reference id {} for read {}", ref_id, read_id))?;

        // noodles positions are 1-based
        let ref_start = (pos.get() - 1) as u32;
        let segments = alignment::extract_exons(ref_start, record.cigar());
        if segments.is_empty() {
            return Ok(None);
        }

        let strand = if flags.is_reverse_complemented() { '-' } else { '+' };
        let span = alignment::query_span(record.cigar());
        let query_len = match self.lengths {
            Some(lengths) => lengths.get(&read_id).ok_or_else(|| {
                anyhow!("read {} is aligned but missing from the input reads", read_id)
            })?,
            None => span.total,
        };
        let (start, end) = span.interval();
        let (query_start, query_end) =
            alignment::oriented_query_interval(start, end, query_len, strand);

        AlignmentRecord::new(
            read_id,
            strand,
            contig.clone(),
            query_start,
            query_end,
            query_len,
            segments,
        )
        .map(Some)
    }
}

impl Iterator for AlignmentInput<'_> {
    type Item = Result<AlignmentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match (self.read_next)(&mut self.record) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.counts.total_records += 1;

            match self.convert() {
                Ok(Some(rec)) => return Some(Ok(rec)),
                Ok(None) => self.counts.unmapped_records += 1,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
