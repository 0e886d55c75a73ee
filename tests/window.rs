use anyhow::Result;
use fusion_finder::alignment::{AlignmentRecord, Segment};
use fusion_finder::coverage::FusionCandidateSet;
use fusion_finder::window::{LocusWindow, LocusWindowStream};

// ── helpers ──────────────────────────────────────────────────────────────────

fn rec(read: &str, contig: &str, strand: char, start: u32, end: u32) -> AlignmentRecord {
    AlignmentRecord::new(read, strand, contig, 0, 100, 200, vec![Segment::new(start, end)])
        .expect("valid record")
}

fn candidates(names: &[&str]) -> FusionCandidateSet {
    names.iter().map(|n| n.to_string()).collect()
}

fn windows(records: Vec<AlignmentRecord>, set: &FusionCandidateSet) -> Result<Vec<LocusWindow>> {
    LocusWindowStream::new(records.into_iter().map(Ok), set).collect()
}

fn starts(window: &LocusWindow) -> (Vec<u32>, Vec<u32>) {
    (
        window.plus.iter().map(|r| r.ref_start).collect(),
        window.minus.iter().map(|r| r.ref_start).collect(),
    )
}

// ── tests ────────────────────────────────────────────────────────────────────

#[test]
fn unsorted_input_is_an_error() {
    let set = candidates(&["a", "b"]);
    let records = vec![rec("a", "chr1", '+', 100, 200), rec("b", "chr1", '+', 50, 150)];
    let err = windows(records, &set).unwrap_err();
    assert!(err.to_string().contains("not sorted"));
}

#[test]
fn stream_stops_after_an_error() {
    let set = candidates(&["a", "b", "c"]);
    let records = vec![
        rec("a", "chr1", '+', 100, 200),
        rec("b", "chr1", '+', 50, 150),
        rec("c", "chr1", '+', 5000, 5100),
    ];
    let mut stream = LocusWindowStream::new(records.into_iter().map(Ok), &set);
    assert!(stream.next().unwrap().is_err());
    assert!(stream.next().is_none());
}

#[test]
fn overlapping_and_touching_records_share_a_window() {
    let set = candidates(&["a", "b", "c", "d"]);
    let records = vec![
        rec("a", "chr1", '+', 100, 200),
        rec("b", "chr1", '+', 150, 300),
        rec("c", "chr1", '+', 300, 400),
        rec("d", "chr1", '+', 401, 500),
    ];
    let out = windows(records, &set).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(starts(&out[0]), (vec![100, 150, 300], vec![]));
    assert_eq!(starts(&out[1]), (vec![401], vec![]));
}

#[test]
fn window_is_split_by_strand() {
    let set = candidates(&["a", "b", "c"]);
    let records = vec![
        rec("a", "chr1", '+', 100, 200),
        rec("b", "chr1", '-', 120, 220),
        rec("c", "chr1", '+', 150, 250),
    ];
    let out = windows(records, &set).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(starts(&out[0]), (vec![100, 150], vec![120]));
    assert_eq!(out[0].contig, "chr1");
    assert_eq!(out[0].len(), 3);
}

#[test]
fn non_candidates_are_skipped() {
    let set = candidates(&["a", "c"]);
    let records = vec![
        rec("a", "chr1", '+', 100, 200),
        rec("b", "chr1", '+', 150, 250),
        rec("c", "chr1", '+', 190, 300),
    ];
    let out = windows(records, &set).unwrap();
    assert_eq!(out.len(), 1);
    let reads: Vec<&str> = out[0].plus.iter().map(|r| r.read_id.as_str()).collect();
    assert_eq!(reads, vec!["a", "c"]);
}

#[test]
fn non_candidate_past_the_window_end_flushes() {
    let set = candidates(&["a", "c"]);
    let records = vec![
        rec("a", "chr1", '+', 100, 200),
        rec("b", "chr1", '+', 250, 350),
        rec("c", "chr1", '+', 300, 400),
    ];
    let out = windows(records, &set).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(starts(&out[0]), (vec![100], vec![]));
    assert_eq!(starts(&out[1]), (vec![300], vec![]));
}

#[test]
fn returning_to_a_finished_contig_is_an_error() {
    let set = candidates(&["a", "b", "c"]);
    let records = vec![
        rec("a", "chr1", '+', 5000, 5100),
        rec("b", "chr2", '+', 10, 110),
        rec("c", "chr1", '+', 5050, 5150),
    ];
    let mut stream = LocusWindowStream::new(records.into_iter().map(Ok), &set);
    assert_eq!(stream.next().unwrap().unwrap().contig, "chr1");
    let err = stream.next().unwrap().unwrap_err();
    assert!(err.to_string().contains("not sorted"));
    assert!(stream.next().is_none());
}

#[test]
fn contig_change_flushes() {
    let set = candidates(&["a", "b"]);
    let records = vec![rec("a", "chr1", '+', 5000, 5100), rec("b", "chr2", '+', 10, 110)];
    let out = windows(records, &set).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].contig, "chr1");
    assert_eq!(out[1].contig, "chr2");
}

#[test]
fn no_candidates_no_windows() {
    let set = FusionCandidateSet::default();
    let records = vec![rec("a", "chr1", '+', 100, 200)];
    assert!(windows(records, &set).unwrap().is_empty());
}
