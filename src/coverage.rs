//! Decide which reads look like fusion transcripts from their alignments alone.
//!
//! A read is a candidate when it maps to two or more well-separated loci that
//! together cover (almost) the whole read, each locus covering a meaningful
//! part of it.

use crate::alignment::AlignmentRecord;
use crate::types::{HashMap, HashMapExt, HashSet, ReadName};
use anyhow::Result;

/// Thresholds of the multi-locus coverage test.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    /// Minimum fraction of the read covered by every single locus.
    pub min_locus_coverage: f64,
    /// Minimum fraction of the read covered by the union of all loci.
    pub min_total_coverage: f64,
    /// Minimum reference gap between any two loci on the same contig.
    pub min_dist_between_loci: i64,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            min_locus_coverage: 0.10,
            min_total_coverage: 0.99,
            min_dist_between_loci: 100_000,
        }
    }
}

/// The per-record facts the coverage test needs.
#[derive(Debug, Clone, Copy)]
pub struct LocusHit {
    pub contig: u32,
    pub query_start: u32,
    pub query_end: u32,
    pub query_len: u32,
    pub query_coverage: f64,
    pub ref_start: u32,
    pub ref_end: u32,
}

/// Read IDs that passed the multi-locus coverage test.
#[derive(Debug, Default, Clone)]
pub struct FusionCandidateSet {
    reads: HashSet<ReadName>,
}

impl FusionCandidateSet {
    pub fn contains(&self, read_id: &str) -> bool {
        self.reads.contains(read_id)
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReadName> {
        self.reads.iter()
    }
}

impl FromIterator<ReadName> for FusionCandidateSet {
    fn from_iter<T: IntoIterator<Item = ReadName>>(iter: T) -> Self {
        Self { reads: iter.into_iter().collect() }
    }
}

/// Collects alignment hits per read, then applies the coverage test.
#[derive(Debug, Default)]
pub struct LocusCoverageAnalyzer {
    filter: CandidateFilter,
    contig_ids: HashMap<String, u32>,
    hits: HashMap<ReadName, Vec<LocusHit>>,
}

impl LocusCoverageAnalyzer {
    pub fn new(filter: CandidateFilter) -> Self {
        Self {
            filter,
            contig_ids: HashMap::new(),
            hits: HashMap::new(),
        }
    }

    pub fn add(&mut self, record: &AlignmentRecord) {
        let next_id = self.contig_ids.len() as u32;
        let contig = match self.contig_ids.get(&record.contig) {
            Some(&id) => id,
            None => {
                self.contig_ids.insert(record.contig.clone(), next_id);
                next_id
            }
        };

        let hit = LocusHit {
            contig,
            query_start: record.query_start,
            query_end: record.query_end,
            query_len: record.query_len,
            query_coverage: record.query_coverage,
            ref_start: record.ref_start,
            ref_end: record.ref_end,
        };
        match self.hits.get_mut(&record.read_id) {
            Some(v) => v.push(hit),
            None => {
                self.hits.insert(record.read_id.clone(), vec![hit]);
            }
        }
    }

    pub fn finish(self) -> FusionCandidateSet {
        let filter = &self.filter;
        self.hits
            .into_iter()
            .filter(|(_, hits)| is_fusion_candidate(hits, filter))
            .map(|(name, _)| name)
            .collect()
    }
}

/// Run the coverage test over a full alignment stream.
pub fn find_fusion_candidates<I>(records: I, filter: &CandidateFilter) -> Result<FusionCandidateSet>
where
    I: IntoIterator<Item = Result<AlignmentRecord>>,
{
    let mut analyzer = LocusCoverageAnalyzer::new(filter.clone());
    for record in records {
        analyzer.add(&record?);
    }
    Ok(analyzer.finish())
}

pub fn is_fusion_candidate(hits: &[LocusHit], filter: &CandidateFilter) -> bool {
    if hits.len() < 2 {
        return false;
    }

    if hits.iter().any(|h| h.query_coverage < filter.min_locus_coverage) {
        return false;
    }

    let query_len = hits[0].query_len;
    let covered = total_coverage(hits.iter().map(|h| (h.query_start, h.query_end)));
    if (covered as f64) / (query_len as f64) < filter.min_total_coverage {
        return false;
    }

    // Loci on different contigs are separated by definition.
    hits.iter().enumerate().all(|(i, a)| {
        hits[i + 1..].iter().all(|b| {
            a.contig != b.contig || locus_distance(a, b) >= filter.min_dist_between_loci
        })
    })
}

/// Reference gap between two hits; negative when they overlap.
pub fn locus_distance(a: &LocusHit, b: &LocusHit) -> i64 {
    a.ref_start.max(b.ref_start) as i64 - a.ref_end.min(b.ref_end) as i64
}

/// Number of bases covered by the union of half-open intervals.
pub fn total_coverage<I>(intervals: I) -> u32
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let mut intervals: Vec<(u32, u32)> = intervals.into_iter().filter(|(s, e)| s < e).collect();
    intervals.sort_unstable();

    let mut covered = 0;
    let mut current: Option<(u32, u32)> = None;
    for (s, e) in intervals {
        match current {
            Some((cs, ce)) if s <= ce => current = Some((cs, ce.max(e))),
            Some((cs, ce)) => {
                covered += ce - cs;
                current = Some((s, e));
            }
            None => current = Some((s, e)),
        }
    }
    if let Some((cs, ce)) = current {
        covered += ce - cs;
    }
    covered
}
