//! fusion-finder: candidate fusion transcripts from sorted long-read genome alignments.
//!
//! Reads mapping to two or more distant loci are picked as candidates, their
//! alignments are streamed in overlapping windows, and per-window alignments
//! are merged into fusion exon groups (one group per fusion side).
//!
//! # Library usage
//!
//! ```no_run
//! use fusion_finder::{FusionConfig, RunInputs, run};
//! use std::path::PathBuf;
//!
//! let inputs = RunInputs {
//!     reads: Some(PathBuf::from("reads.fasta")),
//!     alignments: PathBuf::from("aligned.sorted.sam"),
//!     output_prefix: PathBuf::from("out/fusion"),
//! };
//! let stats = run(&inputs, &FusionConfig::default())?;
//! println!("{} fusion genes", stats.fusion_genes);
//! # Ok::<(), anyhow::Error>(())
//! ```

// Internal modules, not part of the public API.
pub(crate) mod bam_input;
pub(crate) mod types;

pub mod alignment;
pub mod annotation;
pub mod cli;
pub mod compat;
pub mod coverage;
pub mod fasta;
pub mod junction;
pub mod merge;
pub mod pipeline;
pub mod window;

// Flat re-exports for the most commonly used public types.
pub use alignment::{AlignmentRecord, Segment};
pub use compat::{CompatParams, is_fusion_compatible};
pub use coverage::{CandidateFilter, FusionCandidateSet, LocusCoverageAnalyzer};
pub use junction::{ExonChainClassifier, JunctionClassifier, JunctionRelation};
pub use merge::{FusionGroup, merge_fusion_exons};
pub use pipeline::{FusionAssembler, FusionConfig, RunInputs, Stats, pair_parts, run};
pub use window::{LocusWindow, LocusWindowStream};
