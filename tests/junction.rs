use fusion_finder::alignment::Segment;
use fusion_finder::junction::{JunctionRelation, compare_exon_chains};

fn chain(blocks: &[(u32, u32)]) -> Vec<Segment> {
    blocks.iter().map(|&(s, e)| Segment::new(s, e)).collect()
}

#[test]
fn single_exons_that_overlap_are_exact() {
    let a = chain(&[(100, 500)]);
    let b = chain(&[(200, 700)]);
    assert_eq!(compare_exon_chains(&a, &b, 0), JunctionRelation::Exact);
}

#[test]
fn disjoint_chains_are_nomatch() {
    let a = chain(&[(100, 200), (300, 400)]);
    let b = chain(&[(1000, 1100), (1200, 1300)]);
    assert_eq!(compare_exon_chains(&a, &b, 0), JunctionRelation::NoMatch);
}

#[test]
fn identical_junctions_are_exact() {
    let a = chain(&[(100, 200), (300, 400), (500, 600)]);
    let b = chain(&[(150, 200), (300, 400), (500, 650)]);
    assert_eq!(compare_exon_chains(&a, &b, 0), JunctionRelation::Exact);
}

#[test]
fn extra_leading_exons_make_super_and_subset() {
    let long = chain(&[(100, 200), (300, 400), (500, 600)]);
    let short = chain(&[(350, 400), (500, 600)]);
    assert_eq!(compare_exon_chains(&long, &short, 0), JunctionRelation::Super);
    assert_eq!(compare_exon_chains(&short, &long, 0), JunctionRelation::Subset);
}

#[test]
fn shifted_splice_site_is_partial_unless_fuzzy() {
    let a = chain(&[(100, 200), (300, 400)]);
    let b = chain(&[(100, 205), (300, 400)]);
    assert_eq!(compare_exon_chains(&a, &b, 0), JunctionRelation::Partial);
    assert_eq!(compare_exon_chains(&a, &b, 5), JunctionRelation::Exact);
}

#[test]
fn relation_labels() {
    assert_eq!(JunctionRelation::Exact.to_string(), "exact");
    assert_eq!(JunctionRelation::NoMatch.as_str(), "nomatch");
}
