use crate::alignment::AlignmentRecord;
use crate::compat::{CompatParams, is_fusion_compatible};
use crate::junction::JunctionClassifier;
use anyhow::Result;

/// Alignments that are pairwise fusion-compatible; one side of a fusion.
pub type FusionGroup = Vec<AlignmentRecord>;

/// Greedy first-fit clique clustering of one strand bucket.
///
/// Each record joins the first existing group whose every member is
/// compatible with it, otherwise it opens a new group. The result depends on
/// input order. Compatibility is not transitive, so the whole group is checked.
pub fn merge_fusion_exons<C: JunctionClassifier + ?Sized>(
    records: Vec<AlignmentRecord>,
    classifier: &C,
    params: &CompatParams,
) -> Result<Vec<FusionGroup>> {
    let mut groups: Vec<FusionGroup> = Vec::new();

    'records: for r1 in records {
        for group in groups.iter_mut() {
            if fits_group(&r1, group, classifier, params)? {
                group.push(r1);
                continue 'records;
            }
        }
        groups.push(vec![r1]);
    }

    Ok(groups)
}

fn fits_group<C: JunctionClassifier + ?Sized>(
    record: &AlignmentRecord,
    group: &[AlignmentRecord],
    classifier: &C,
    params: &CompatParams,
) -> Result<bool> {
    for member in group {
        if !is_fusion_compatible(record, member, classifier, params)? {
            return Ok(false);
        }
    }
    Ok(true)
}
