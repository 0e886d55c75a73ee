//! Pairwise test deciding whether two same-strand alignments can describe the
//! same side of one fusion event.

use crate::alignment::AlignmentRecord;
use crate::junction::{JunctionClassifier, JunctionRelation};
use anyhow::{Result, bail};

/// Alignments starting before this query offset belong to the read's 5' portion.
pub const MAX_QSTART_FOR_5: u32 = 100;

/// Parameters of the compatibility test.
#[derive(Debug, Clone, Copy)]
pub struct CompatParams {
    /// Largest allowed distance between fusion points (or terminal exon ends).
    pub max_fusion_point_dist: u32,
    /// Accept chains that differ only by extra exons on the 5' side.
    pub allow_extra_5_exons: bool,
}

impl Default for CompatParams {
    fn default() -> Self {
        Self {
            max_fusion_point_dist: 100,
            allow_extra_5_exons: true,
        }
    }
}

pub fn in_5_portion(record: &AlignmentRecord) -> bool {
    record.query_start < MAX_QSTART_FOR_5
}

/// Returns whether `r1` and `r2` may be merged into one fusion group.
///
/// Both records must be on the same strand. An `Exact` relation between a
/// single-exon and a multi-exon record is an inconsistency of the classifier
/// and is returned as an error.
pub fn is_fusion_compatible<C: JunctionClassifier + ?Sized>(
    r1: &AlignmentRecord,
    r2: &AlignmentRecord,
    classifier: &C,
    params: &CompatParams,
) -> Result<bool> {
    assert_eq!(
        r1.strand, r2.strand,
        "fusion compatibility is only defined for records on the same strand"
    );

    let in_5 = in_5_portion(r1);
    if in_5 != in_5_portion(r2) {
        return Ok(false);
    }
    let plus_is_5end = r1.strand == '+';
    let max_dist = params.max_fusion_point_dist;

    let relation = classifier.classify(r1, r2);
    match relation {
        JunctionRelation::Exact => match (r1.is_single_exon(), r2.is_single_exon()) {
            (true, true) => {
                let dist = if in_5 && plus_is_5end {
                    r1.ref_start.abs_diff(r2.ref_start)
                } else {
                    r1.ref_end.abs_diff(r2.ref_end)
                };
                Ok(dist <= max_dist)
            }
            (false, false) => Ok(true),
            _ => bail!(
                "junction relation of {} and {} is exact but only one of them is single-exon",
                r1.read_id,
                r2.read_id
            ),
        },
        JunctionRelation::Super | JunctionRelation::Subset => {
            if !params.allow_extra_5_exons || !in_5 {
                return Ok(false);
            }
            // the 3' junction must be shared and the 3' end close by
            if plus_is_5end {
                let (l1, l2) = (r1.last_segment(), r2.last_segment());
                Ok(l1.start == l2.start && l1.end.abs_diff(l2.end) <= max_dist)
            } else {
                let (f1, f2) = (r1.first_segment(), r2.first_segment());
                Ok(f1.end == f2.end && f1.start.abs_diff(f2.start) <= max_dist)
            }
        }
        _ => Ok(false),
    }
}
