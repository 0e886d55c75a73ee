use crate::annotation::{AnnotationWriter, GtfGroupWriter};
use crate::bam_input;
use crate::compat::CompatParams;
use crate::coverage::{CandidateFilter, FusionCandidateSet, find_fusion_candidates};
use crate::fasta::ReadLengths;
use crate::junction::{ExonChainClassifier, JunctionClassifier};
use crate::merge::{FusionGroup, merge_fusion_exons};
use crate::types::{GroupId, ReadName};
use crate::window::{LocusWindow, LocusWindowStream};
use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FusionConfig {
    pub filter: CandidateFilter,
    pub compat: CompatParams,
    /// End slack handed to the annotation writer.
    pub tolerate_end: u32,
    pub gene_prefix: String,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            filter: CandidateFilter::default(),
            compat: CompatParams::default(),
            tolerate_end: 100,
            gene_prefix: "PBfusion".to_string(),
        }
    }
}

/// Input files and output prefix of one run.
#[derive(Debug, Clone)]
pub struct RunInputs {
    /// FASTA/FASTQ of the aligned reads; lengths fall back to the CIGAR when absent.
    pub reads: Option<PathBuf>,
    /// Coordinate-sorted SAM or BAM.
    pub alignments: PathBuf,
    pub output_prefix: PathBuf,
}

impl RunInputs {
    pub fn annotation_path(&self) -> PathBuf {
        with_suffix(&self.output_prefix, ".gff")
    }

    pub fn group_path(&self) -> PathBuf {
        with_suffix(&self.output_prefix, ".group.txt")
    }

    pub fn tmp_group_path(&self) -> PathBuf {
        with_suffix(&self.output_prefix, ".tmp.group.txt")
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

#[derive(Debug, Default)]
pub struct Stats {
    pub total_records: u64,
    pub unmapped_records: u64,
    pub candidate_reads: u64,
    pub windows: u64,
    pub groups: u64,
    pub fusion_genes: u64,
}

/// Run-scoped accumulation of fusion groups and the parts each read took part in.
#[derive(Debug, Default)]
pub struct FusionAssembler {
    groups: Vec<FusionGroup>,
    pointers: IndexMap<ReadName, Vec<GroupId>>,
}

impl FusionAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every non-empty strand bucket of `window` and record the groups.
    pub fn add_window<C: JunctionClassifier + ?Sized>(
        &mut self,
        window: LocusWindow,
        classifier: &C,
        params: &CompatParams,
    ) -> Result<()> {
        for (_strand, bucket) in window.into_buckets() {
            if bucket.is_empty() {
                continue;
            }
            for group in merge_fusion_exons(bucket, classifier, params)? {
                let idx = self.groups.len();
                for r in &group {
                    self.pointers.entry(r.read_id.clone()).or_default().push(idx);
                }
                self.groups.push(group);
            }
        }
        Ok(())
    }

    pub fn groups(&self) -> &[FusionGroup] {
        &self.groups
    }

    /// Group indices per read, in the order reads were first seen.
    pub fn pointers(&self) -> &IndexMap<ReadName, Vec<GroupId>> {
        &self.pointers
    }

    /// One gene number per read, counting from 1 in pointer order.
    pub fn gene_assignment(&self) -> IndexMap<ReadName, usize> {
        self.pointers
            .keys()
            .enumerate()
            .map(|(i, read)| (read.clone(), i + 1))
            .collect()
    }

    /// Hand every part of every fusion gene to `writer`; returns the number of genes.
    pub fn write_parts<W: AnnotationWriter + ?Sized>(
        &self,
        writer: &mut W,
        prefix: &str,
        tolerate_end: u32,
    ) -> Result<usize> {
        let genes = self.gene_assignment();
        for (read, indices) in &self.pointers {
            let gene_index = genes[read];
            for (part_index, &i) in indices.iter().enumerate() {
                writer.write_part(&self.groups[i], gene_index, part_index, prefix, tolerate_end)?;
            }
        }
        Ok(genes.len())
    }
}

/// Collapse the per-part grouping lines into one row per fusion gene.
///
/// Lines are consumed two at a time; both must belong to the same gene. The
/// row lists the reads supporting both parts. Returns the number of rows.
pub fn pair_parts<R: BufRead, W: Write>(input: R, mut output: W) -> Result<usize> {
    let mut lines = input.lines();
    let mut count = 0;

    loop {
        let line1 = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line1.trim().is_empty() {
            break;
        }
        let line2 = lines
            .next()
            .transpose()?
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| anyhow!("fusion part '{}' has no second part", line1.trim()))?;

        let (gene1, reads1) = parse_part_line(&line1)?;
        let (gene2, reads2) = parse_part_line(&line2)?;
        if gene1 != gene2 {
            bail!(
                "consecutive fusion parts belong to different genes: {} and {}",
                gene1,
                gene2
            );
        }

        let shared: BTreeSet<&str> = reads1.intersection(&reads2).copied().collect();
        let shared: Vec<&str> = shared.into_iter().collect();
        writeln!(output, "{}\t{}", gene1, shared.join(","))?;
        count += 1;
    }

    output.flush()?;
    Ok(count)
}

fn parse_part_line(line: &str) -> Result<(&str, BTreeSet<&str>)> {
    let line = line.trim();
    let (part, reads) = line
        .split_once('\t')
        .ok_or_else(|| anyhow!("malformed grouping line: {}", line))?;
    let (gene, _) = part
        .rsplit_once('.')
        .ok_or_else(|| anyhow!("malformed part identifier: {}", part))?;
    let reads = reads.split(',').filter(|r| !r.is_empty()).collect();
    Ok((gene, reads))
}

pub fn run(inputs: &RunInputs, config: &FusionConfig) -> Result<Stats> {
    let classifier = ExonChainClassifier::default();
    run_with_classifier(inputs, config, &classifier)
}

pub fn run_with_classifier<C: JunctionClassifier + ?Sized>(
    inputs: &RunInputs,
    config: &FusionConfig,
    classifier: &C,
) -> Result<Stats> {
    let mut stats = Stats::default();

    let lengths = match &inputs.reads {
        Some(path) => {
            let lengths = ReadLengths::load(path)?;
            tracing::info!(reads = lengths.len(), "read IDs are unique");
            Some(lengths)
        }
        None => None,
    };

    let candidates = find_candidates(inputs, config, lengths.as_ref(), &mut stats)?;
    stats.candidate_reads = candidates.len() as u64;
    tracing::info!(candidates = candidates.len(), "fusion candidates identified");

    let mut assembler = FusionAssembler::new();
    let mut input = bam_input::open_alignments(&inputs.alignments, lengths.as_ref())?;
    for window in LocusWindowStream::new(&mut input, &candidates) {
        let window = window?;
        stats.windows += 1;
        assembler.add_window(window, classifier, &config.compat)?;
    }
    stats.groups = assembler.groups().len() as u64;
    tracing::info!(
        windows = stats.windows,
        groups = stats.groups,
        "fusion exon groups merged"
    );

    let tmp_path = inputs.tmp_group_path();
    let mut writer = GtfGroupWriter::create(&inputs.annotation_path(), &tmp_path)?;
    let genes = assembler.write_parts(&mut writer, &config.gene_prefix, config.tolerate_end)?;
    tracing::info!(genes, parts = writer.parts_written, "fusion parts written");
    writer.finish()?;

    let group_path = inputs.group_path();
    let paired = pair_group_file(&tmp_path, &group_path);
    std::fs::remove_file(&tmp_path)
        .with_context(|| format!("failed to remove {}", tmp_path.display()))?;
    match paired {
        Ok(count) => stats.fusion_genes = count as u64,
        Err(e) => {
            let _ = std::fs::remove_file(&group_path);
            return Err(e);
        }
    }

    Ok(stats)
}

fn pair_group_file(tmp_path: &Path, group_path: &Path) -> Result<usize> {
    let tmp = File::open(tmp_path)
        .with_context(|| format!("failed to reopen {}", tmp_path.display()))?;
    let out = File::create(group_path)
        .with_context(|| format!("failed to create {}", group_path.display()))?;
    pair_parts(BufReader::new(tmp), BufWriter::new(out))
}

fn find_candidates(
    inputs: &RunInputs,
    config: &FusionConfig,
    lengths: Option<&ReadLengths>,
    stats: &mut Stats,
) -> Result<FusionCandidateSet> {
    let mut input = bam_input::open_alignments(&inputs.alignments, lengths)?;
    let candidates = find_fusion_candidates(&mut input, &config.filter)?;
    stats.total_records = input.counts.total_records;
    stats.unmapped_records = input.counts.unmapped_records;
    Ok(candidates)
}
