use crate::types::ReadName;
use anyhow::{Result, bail, ensure};
use noodles::sam::alignment::record::cigar::op::Kind as CigarKind;
use noodles::sam::alignment::record_buf::Cigar;

/// One aligned exon block, 0-based half-open `[start, end)` on the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
}

impl Segment {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Number of shared bases; zero when the blocks only touch or are apart.
    pub fn overlap(&self, other: &Segment) -> u32 {
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }
}

/// One alignment of a read to the reference.
///
/// Query coordinates are in read orientation: for `'-'` records the span has
/// already been flipped, so `query_start < 100` always means "near the 5' end
/// of the read".
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub read_id: ReadName,
    pub strand: char,
    pub contig: String,
    pub query_start: u32,
    pub query_end: u32,
    pub query_len: u32,
    pub query_coverage: f64,
    pub ref_start: u32,
    pub ref_end: u32,
    pub segments: Vec<Segment>,
}

impl AlignmentRecord {
    pub fn new(
        read_id: impl Into<ReadName>,
        strand: char,
        contig: impl Into<String>,
        query_start: u32,
        query_end: u32,
        query_len: u32,
        segments: Vec<Segment>,
    ) -> Result<Self> {
        let read_id = read_id.into();
        ensure!(
            strand == '+' || strand == '-',
            "invalid strand '{}' for read {}",
            strand,
            read_id
        );
        ensure!(!segments.is_empty(), "alignment of read {} has no exon segments", read_id);
        ensure!(query_len > 0, "read {} has zero query length", read_id);
        ensure!(
            query_start <= query_end && query_end <= query_len,
            "query span {}-{} of read {} exceeds read length {}",
            query_start,
            query_end,
            read_id,
            query_len
        );
        for (k, seg) in segments.iter().enumerate() {
            ensure!(!seg.is_empty(), "empty exon segment in alignment of read {}", read_id);
            if k > 0 && seg.start < segments[k - 1].end {
                bail!("exon segments of read {} are not in ascending order", read_id);
            }
        }

        let ref_start = segments[0].start;
        let ref_end = segments[segments.len() - 1].end;
        Ok(Self {
            read_id,
            strand,
            contig: contig.into(),
            query_start,
            query_end,
            query_len,
            query_coverage: (query_end - query_start) as f64 / query_len as f64,
            ref_start,
            ref_end,
            segments,
        })
    }

    pub fn is_single_exon(&self) -> bool {
        self.segments.len() == 1
    }

    pub fn first_segment(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn last_segment(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }
}

/// Extract exon segments from a spliced alignment.
///
/// CIGAR `N` operations split exons (splice junctions).
/// `ref_start` is 0-based; segments are returned 0-based, half-open.
pub fn extract_exons(ref_start: u32, cigar: &Cigar) -> Vec<Segment> {
    let mut ref_pos = ref_start;
    let mut exon_start = ref_pos;
    let mut exons: Vec<Segment> = Vec::new();

    for op in cigar.as_ref().iter() {
        let n = op.len() as u32;
        match op.kind() {
            CigarKind::Match
            | CigarKind::SequenceMatch
            | CigarKind::SequenceMismatch
            | CigarKind::Deletion => {
                ref_pos = ref_pos.saturating_add(n);
            }
            CigarKind::Skip => {
                if ref_pos > exon_start {
                    exons.push(Segment { start: exon_start, end: ref_pos });
                }
                ref_pos = ref_pos.saturating_add(n);
                exon_start = ref_pos;
            }
            // Non-reference-consuming: Insertion, SoftClip, HardClip, Pad
            _ => {}
        }
    }

    if ref_pos > exon_start {
        exons.push(Segment { start: exon_start, end: ref_pos });
    }

    exons
}

/// Query-side extent of an alignment as read from its CIGAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuerySpan {
    /// Bases clipped (soft or hard) before the first aligned base.
    pub leading_clip: u32,
    /// Query bases consumed by `M`, `I`, `=` and `X`.
    pub aligned: u32,
    /// Full read length implied by the CIGAR, clips included.
    pub total: u32,
}

impl QuerySpan {
    /// Span in alignment orientation, `[start, end)`.
    pub fn interval(&self) -> (u32, u32) {
        (self.leading_clip, self.leading_clip + self.aligned)
    }
}

pub fn query_span(cigar: &Cigar) -> QuerySpan {
    let mut span = QuerySpan::default();
    let mut seen_aligned = false;

    for op in cigar.as_ref().iter() {
        let n = op.len() as u32;
        match op.kind() {
            CigarKind::SoftClip | CigarKind::HardClip => {
                if !seen_aligned {
                    span.leading_clip += n;
                }
                span.total += n;
            }
            CigarKind::Match
            | CigarKind::Insertion
            | CigarKind::SequenceMatch
            | CigarKind::SequenceMismatch => {
                seen_aligned = true;
                span.aligned += n;
                span.total += n;
            }
            CigarKind::Deletion | CigarKind::Skip => {
                seen_aligned = true;
            }
            CigarKind::Pad => {}
        }
    }

    span
}

/// Flip a query interval to read orientation for reverse-strand alignments.
pub fn oriented_query_interval(start: u32, end: u32, query_len: u32, strand: char) -> (u32, u32) {
    if strand == '-' {
        (query_len.saturating_sub(end), query_len.saturating_sub(start))
    } else {
        (start, end)
    }
}
