use crate::alignment::{AlignmentRecord, Segment};
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Receives every part (one fusion group under one gene number) for output.
pub trait AnnotationWriter {
    fn write_part(
        &mut self,
        group: &[AlignmentRecord],
        gene_index: usize,
        part_index: usize,
        prefix: &str,
        tolerate_end: u32,
    ) -> Result<()>;
}

/// `"<prefix>.<gene>"`
pub fn gene_id(prefix: &str, gene_index: usize) -> String {
    format!("{}.{}", prefix, gene_index)
}

/// `"<prefix>.<gene>.<part + 1>"`
pub fn part_id(prefix: &str, gene_index: usize, part_index: usize) -> String {
    format!("{}.{}.{}", prefix, gene_index, part_index + 1)
}

/// Overlap-union of the exon blocks of every group member.
///
/// Blocks that share at least one base merge; blocks that only touch or are
/// apart stay separate exons.
pub fn consensus_exons(group: &[AlignmentRecord]) -> Vec<Segment> {
    let mut blocks: Vec<Segment> = group
        .iter()
        .flat_map(|r| r.segments.iter().copied())
        .collect();
    blocks.sort_unstable_by_key(|s| (s.start, s.end));

    let mut exons: Vec<Segment> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match exons.last_mut() {
            Some(last) if block.start < last.end => last.end = last.end.max(block.end),
            _ => exons.push(block),
        }
    }
    exons
}

/// Writes GTF-style transcript/exon lines and a `part -> reads` grouping file.
pub struct GtfGroupWriter<A: Write, G: Write> {
    annotation: A,
    groups: G,
    pub parts_written: usize,
}

impl GtfGroupWriter<BufWriter<File>, BufWriter<File>> {
    pub fn create(annotation_path: &Path, group_path: &Path) -> Result<Self> {
        let annotation = File::create(annotation_path)
            .with_context(|| format!("failed to create {}", annotation_path.display()))?;
        let groups = File::create(group_path)
            .with_context(|| format!("failed to create {}", group_path.display()))?;
        Ok(Self::new(BufWriter::new(annotation), BufWriter::new(groups)))
    }
}

impl<A: Write, G: Write> GtfGroupWriter<A, G> {
    pub fn new(annotation: A, groups: G) -> Self {
        Self {
            annotation,
            groups,
            parts_written: 0,
        }
    }

    pub fn finish(mut self) -> Result<(A, G)> {
        self.annotation.flush()?;
        self.groups.flush()?;
        Ok((self.annotation, self.groups))
    }
}

impl<A: Write, G: Write> AnnotationWriter for GtfGroupWriter<A, G> {
    fn write_part(
        &mut self,
        group: &[AlignmentRecord],
        gene_index: usize,
        part_index: usize,
        prefix: &str,
        tolerate_end: u32,
    ) -> Result<()> {
        ensure!(!group.is_empty(), "cannot write an empty fusion group");

        let gene = gene_id(prefix, gene_index);
        let part = part_id(prefix, gene_index, part_index);
        let contig = &group[0].contig;
        let strand = group[0].strand;
        let exons = consensus_exons(group);
        let (start, end) = (exons[0].start, exons[exons.len() - 1].end);

        for r in group {
            if r.ref_start.abs_diff(start) > tolerate_end || r.ref_end.abs_diff(end) > tolerate_end {
                tracing::debug!(
                    part = %part,
                    read = %r.read_id,
                    "member ends deviate from consensus by more than {} bp",
                    tolerate_end
                );
            }
        }

        let attrs = format!("gene_id \"{}\"; transcript_id \"{}\";", gene, part);
        writeln!(
            self.annotation,
            "{}\tPacBio\ttranscript\t{}\t{}\t.\t{}\t.\t{}",
            contig,
            start + 1,
            end,
            strand,
            attrs
        )?;
        for exon in &exons {
            writeln!(
                self.annotation,
                "{}\tPacBio\texon\t{}\t{}\t.\t{}\t.\t{}",
                contig,
                exon.start + 1,
                exon.end,
                strand,
                attrs
            )?;
        }

        let reads: IndexSet<&str> = group.iter().map(|r| r.read_id.as_str()).collect();
        let reads: Vec<&str> = reads.into_iter().collect();
        writeln!(self.groups, "{}\t{}", part, reads.join(","))?;

        self.parts_written += 1;
        Ok(())
    }
}
