use crate::alignment::AlignmentRecord;
use crate::coverage::FusionCandidateSet;
use crate::types::{HashSet, HashSetExt};
use anyhow::{Result, bail};

/// A maximal run of touching or overlapping candidate alignments on one contig,
/// split by strand.
#[derive(Debug, Clone, Default)]
pub struct LocusWindow {
    pub contig: String,
    pub plus: Vec<AlignmentRecord>,
    pub minus: Vec<AlignmentRecord>,
}

impl LocusWindow {
    pub fn from_records(records: Vec<AlignmentRecord>) -> Self {
        let contig = records.first().map(|r| r.contig.clone()).unwrap_or_default();
        let (plus, minus): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.strand == '+');
        Self { contig, plus, minus }
    }

    /// Strand buckets in fixed `'+'`, `'-'` order.
    pub fn into_buckets(self) -> [(char, Vec<AlignmentRecord>); 2] {
        [('+', self.plus), ('-', self.minus)]
    }

    pub fn len(&self) -> usize {
        self.plus.len() + self.minus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plus.is_empty() && self.minus.is_empty()
    }
}

/// Groups a coordinate-sorted alignment stream into `LocusWindow`s holding
/// candidate reads only.
///
/// Every record is checked against the tail of the current window: a start
/// before the tail's start on the same contig means the input is not sorted,
/// which ends the stream with an error. So does a record on a contig the
/// stream has already left.
pub struct LocusWindowStream<'a, I> {
    records: I,
    candidates: &'a FusionCandidateSet,
    buffer: Vec<AlignmentRecord>,
    contig: Option<String>,
    done_contigs: HashSet<String>,
    finished: bool,
}

impl<'a, I> LocusWindowStream<'a, I>
where
    I: Iterator<Item = Result<AlignmentRecord>>,
{
    pub fn new(records: I, candidates: &'a FusionCandidateSet) -> Self {
        Self {
            records,
            candidates,
            buffer: Vec::new(),
            contig: None,
            done_contigs: HashSet::new(),
            finished: false,
        }
    }

    fn flush(&mut self) -> LocusWindow {
        LocusWindow::from_records(std::mem::take(&mut self.buffer))
    }

    /// Feed one record; returns a finished window when `record` closes one.
    fn push(&mut self, record: AlignmentRecord) -> Result<Option<LocusWindow>> {
        self.enter_contig(&record)?;
        let mut window = None;

        if let (Some(first), Some(last)) = (self.buffer.first(), self.buffer.last()) {
            let same_contig = record.contig == first.contig;
            if same_contig && record.ref_start < last.ref_start {
                bail!(
                    "alignments are not sorted: {} at {}:{} follows {} at {}:{}",
                    record.read_id,
                    record.contig,
                    record.ref_start,
                    last.read_id,
                    last.contig,
                    last.ref_start
                );
            }
            if !same_contig || record.ref_start > last.ref_end {
                window = Some(self.flush());
            }
        }

        if self.candidates.contains(&record.read_id) {
            self.buffer.push(record);
        }
        Ok(window)
    }

    fn enter_contig(&mut self, record: &AlignmentRecord) -> Result<()> {
        if self.contig.as_deref() == Some(record.contig.as_str()) {
            return Ok(());
        }
        if self.done_contigs.contains(&record.contig) {
            bail!(
                "alignments are not sorted: {} returns to contig {} after {}",
                record.read_id,
                record.contig,
                self.contig.as_deref().unwrap_or("")
            );
        }
        if let Some(prev) = self.contig.replace(record.contig.clone()) {
            self.done_contigs.insert(prev);
        }
        Ok(())
    }
}

impl<I> Iterator for LocusWindowStream<'_, I>
where
    I: Iterator<Item = Result<AlignmentRecord>>,
{
    type Item = Result<LocusWindow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(result) = self.records.next() {
            let step = result.and_then(|record| self.push(record));
            match step {
                Ok(Some(window)) => return Some(Ok(window)),
                Ok(None) => {}
                Err(e) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Some(Err(e));
                }
            }
        }

        self.finished = true;
        if self.buffer.is_empty() {
            None
        } else {
            Some(Ok(self.flush()))
        }
    }
}
