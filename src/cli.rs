use crate::compat::CompatParams;
use crate::coverage::CandidateFilter;
use crate::pipeline::{FusionConfig, RunInputs};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fusion-finder",
    about = "Identify candidate fusion transcripts from sorted long-read genome alignments",
    version
)]
pub struct Args {
    /// Input FASTA/FASTQ of the aligned reads (read lengths, duplicate-ID check)
    #[arg(long = "input", value_name = "FA/FQ")]
    pub input: Option<PathBuf>,

    /// Coordinate-sorted SAM/BAM with genomic alignments
    #[arg(short = 's', long = "sam", value_name = "SAM/BAM")]
    pub sam: PathBuf,

    /// Output filename prefix
    #[arg(short = 'o', long = "prefix", value_name = "PREFIX")]
    pub prefix: PathBuf,

    /// Don't collapse shorter 5' transcripts
    #[arg(long = "dun-merge-5-shorter")]
    pub dun_merge_5_shorter: bool,

    /// Minimum fraction of the read covered by each locus
    #[arg(long, default_value_t = 0.10)]
    pub min_locus_coverage: f64,

    /// Minimum fraction of the read covered by all loci together
    #[arg(long, default_value_t = 0.99)]
    pub min_total_coverage: f64,

    /// Minimum distance between two loci on the same contig
    #[arg(long, default_value_t = 100_000)]
    pub min_dist_between_loci: i64,

    /// Maximum distance between fusion points of merged alignments
    #[arg(long, default_value_t = 100)]
    pub max_fusion_point_dist: u32,

    /// End slack used when writing merged parts
    #[arg(long, default_value_t = 100)]
    pub tolerate_end: u32,

    /// Prefix of fusion gene identifiers
    #[arg(long, default_value = "PBfusion")]
    pub gene_prefix: String,

    /// Set logging level to WARN
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Args {
    pub fn config(&self) -> FusionConfig {
        FusionConfig {
            filter: CandidateFilter {
                min_locus_coverage: self.min_locus_coverage,
                min_total_coverage: self.min_total_coverage,
                min_dist_between_loci: self.min_dist_between_loci,
            },
            compat: CompatParams {
                max_fusion_point_dist: self.max_fusion_point_dist,
                allow_extra_5_exons: !self.dun_merge_5_shorter,
            },
            tolerate_end: self.tolerate_end,
            gene_prefix: self.gene_prefix.clone(),
        }
    }

    pub fn inputs(&self) -> RunInputs {
        RunInputs {
            reads: self.input.clone(),
            alignments: self.sam.clone(),
            output_prefix: self.prefix.clone(),
        }
    }
}
