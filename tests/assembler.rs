use anyhow::Result;
use fusion_finder::alignment::{AlignmentRecord, Segment};
use fusion_finder::annotation::{AnnotationWriter, GtfGroupWriter, consensus_exons};
use fusion_finder::compat::CompatParams;
use fusion_finder::fasta::ReadLengths;
use fusion_finder::junction::JunctionRelation;
use fusion_finder::pipeline::{FusionAssembler, pair_parts};
use fusion_finder::window::LocusWindow;

// ── helpers ──────────────────────────────────────────────────────────────────

fn rec(read: &str, contig: &str, strand: char, q: u32, start: u32, end: u32) -> AlignmentRecord {
    AlignmentRecord::new(read, strand, contig, q, q + 100, 200, vec![Segment::new(start, end)])
        .expect("valid record")
}

fn exact(_: &AlignmentRecord, _: &AlignmentRecord) -> JunctionRelation {
    JunctionRelation::Exact
}

/// Remembers every part handed to it.
#[derive(Default)]
struct Recorder {
    parts: Vec<(Vec<String>, usize, usize)>,
}

impl AnnotationWriter for Recorder {
    fn write_part(
        &mut self,
        group: &[AlignmentRecord],
        gene_index: usize,
        part_index: usize,
        _prefix: &str,
        _tolerate_end: u32,
    ) -> Result<()> {
        let reads = group.iter().map(|r| r.read_id.clone()).collect();
        self.parts.push((reads, gene_index, part_index));
        Ok(())
    }
}

fn two_sided_assembler() -> FusionAssembler {
    let params = CompatParams::default();
    let mut assembler = FusionAssembler::new();
    let chr1 = LocusWindow::from_records(vec![
        rec("r1", "chr1", '+', 0, 1000, 1100),
        rec("r2", "chr1", '+', 0, 1010, 1110),
        rec("r3", "chr1", '-', 0, 1020, 1120),
    ]);
    let chr2 = LocusWindow::from_records(vec![
        rec("r1", "chr2", '+', 100, 5000, 5100),
        rec("r2", "chr2", '+', 100, 5020, 5120),
    ]);
    assembler.add_window(chr1, &exact, &params).unwrap();
    assembler.add_window(chr2, &exact, &params).unwrap();
    assembler
}

// ── tests ────────────────────────────────────────────────────────────────────

#[test]
fn pointers_follow_group_creation_order() {
    let assembler = two_sided_assembler();
    // chr1 '+', chr1 '-', chr2 '+'
    assert_eq!(assembler.groups().len(), 3);

    let pointers: Vec<(&str, Vec<usize>)> = assembler
        .pointers()
        .iter()
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    assert_eq!(
        pointers,
        vec![("r1", vec![0, 2]), ("r2", vec![0, 2]), ("r3", vec![1])]
    );

    let assignment = assembler.gene_assignment();
    let genes: Vec<(&str, usize)> = assignment
        .iter()
        .map(|(k, &v)| (k.as_str(), v))
        .collect();
    assert_eq!(genes, vec![("r1", 1), ("r2", 2), ("r3", 3)]);
}

#[test]
fn every_part_of_every_read_is_written() {
    let assembler = two_sided_assembler();
    let mut recorder = Recorder::default();
    let genes = assembler.write_parts(&mut recorder, "PBfusion", 100).unwrap();
    assert_eq!(genes, 3);

    let summary: Vec<(usize, usize, usize)> = recorder
        .parts
        .iter()
        .map(|(reads, gene, part)| (reads.len(), *gene, *part))
        .collect();
    assert_eq!(summary, vec![(2, 1, 0), (2, 1, 1), (2, 2, 0), (2, 2, 1), (1, 3, 0)]);
}

#[test]
fn gtf_writer_output_feeds_the_pairing_pass() {
    let assembler = two_sided_assembler();
    let mut writer = GtfGroupWriter::new(Vec::new(), Vec::new());
    assembler.write_parts(&mut writer, "PBfusion", 100).unwrap();
    assert_eq!(writer.parts_written, 5);
    let (gff, groups) = writer.finish().unwrap();

    let gff = String::from_utf8(gff).unwrap();
    assert!(gff.contains(
        "chr2\tPacBio\texon\t5001\t5120\t.\t+\t.\tgene_id \"PBfusion.1\"; transcript_id \"PBfusion.1.2\";"
    ));

    // gene 3 has a single part
    let err = pair_parts(groups.as_slice(), Vec::new()).unwrap_err();
    assert!(err.to_string().contains("PBfusion.3.1"));
}

#[test]
fn consensus_keeps_separate_exons_apart() {
    let a = AlignmentRecord::new(
        "a",
        '+',
        "chr1",
        0,
        100,
        200,
        vec![Segment::new(100, 200), Segment::new(300, 400)],
    )
    .unwrap();
    let b = AlignmentRecord::new(
        "b",
        '+',
        "chr1",
        0,
        100,
        200,
        vec![Segment::new(150, 250), Segment::new(300, 420)],
    )
    .unwrap();
    assert_eq!(
        consensus_exons(&[a, b]),
        vec![Segment::new(100, 250), Segment::new(300, 420)]
    );
}

#[test]
fn read_table_rejects_duplicates() {
    let lengths = ReadLengths::from_pairs([("r1", 200), ("r2", 150)]).unwrap();
    assert_eq!(lengths.get("r2"), Some(150));
    assert_eq!(lengths.get("r3"), None);
    assert!(ReadLengths::from_pairs([("r1", 200), ("r1", 150)]).is_err());
}
