use crate::alignment::{AlignmentRecord, Segment};
use std::fmt;

/// How the exon chains of two alignments relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JunctionRelation {
    /// Same junctions (or both single-exon and overlapping).
    Exact,
    /// The first chain contains the second plus extra exons.
    Super,
    /// The first chain is contained in the second.
    Subset,
    /// Overlapping chains with extra exons on both sides and matching shared junctions.
    Concordant,
    /// Overlapping chains with disagreeing junctions.
    Partial,
    /// No exon overlap at all.
    NoMatch,
}

impl JunctionRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            JunctionRelation::Exact => "exact",
            JunctionRelation::Super => "super",
            JunctionRelation::Subset => "subset",
            JunctionRelation::Concordant => "concordant",
            JunctionRelation::Partial => "partial",
            JunctionRelation::NoMatch => "nomatch",
        }
    }
}

impl fmt::Display for JunctionRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compares the exon chains of two alignments.
pub trait JunctionClassifier {
    fn classify(&self, r1: &AlignmentRecord, r2: &AlignmentRecord) -> JunctionRelation;
}

impl<F> JunctionClassifier for F
where
    F: Fn(&AlignmentRecord, &AlignmentRecord) -> JunctionRelation,
{
    fn classify(&self, r1: &AlignmentRecord, r2: &AlignmentRecord) -> JunctionRelation {
        self(r1, r2)
    }
}

/// Default classifier walking both chains from their first overlapping exons.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExonChainClassifier {
    /// Slack allowed on internal splice sites.
    pub internal_fuzzy_max_dist: u32,
}

impl JunctionClassifier for ExonChainClassifier {
    fn classify(&self, r1: &AlignmentRecord, r2: &AlignmentRecord) -> JunctionRelation {
        compare_exon_chains(&r1.segments, &r2.segments, self.internal_fuzzy_max_dist)
    }
}

fn first_overlap(a: &[Segment], b: &[Segment]) -> Option<(usize, usize)> {
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            // only one of the two chains may be entered past its first exon
            if i > 0 && j > 0 {
                break;
            }
            if x.overlap(y) > 0 {
                return Some((i, j));
            }
        }
    }
    None
}

pub fn compare_exon_chains(a: &[Segment], b: &[Segment], fuzzy: u32) -> JunctionRelation {
    let Some((i, j)) = first_overlap(a, b) else {
        return JunctionRelation::NoMatch;
    };

    if a.len() == 1 {
        if b.len() == 1 {
            return JunctionRelation::Exact;
        }
        return if a[0].end <= b[j].end {
            JunctionRelation::Subset
        } else {
            JunctionRelation::Partial
        };
    }
    if b.len() == 1 {
        return JunctionRelation::Super;
    }

    let junction_differs = |ia: usize, ib: usize| {
        a[ia].end.abs_diff(b[ib].end) > fuzzy || a[ia + 1].start.abs_diff(b[ib + 1].start) > fuzzy
    };

    let mut k = 0;
    while i + k + 1 < a.len() && j + k + 1 < b.len() {
        if junction_differs(i + k, j + k) {
            return JunctionRelation::Partial;
        }
        k += 1;
    }

    let a_done = i + k + 1 == a.len();
    let b_done = j + k + 1 == b.len();
    match (a_done, b_done) {
        (true, true) => match (i, j) {
            (0, 0) => JunctionRelation::Exact,
            (0, _) => JunctionRelation::Subset,
            _ => JunctionRelation::Super,
        },
        (true, false) if i == 0 => JunctionRelation::Subset,
        (false, _) if j == 0 => JunctionRelation::Super,
        _ => {
            if k == 0 || junction_differs(i + k - 1, j + k - 1) {
                JunctionRelation::Partial
            } else {
                JunctionRelation::Concordant
            }
        }
    }
}
