use anyhow::Result;
use clap::Parser;
use fusion_finder::cli::Args;
use fusion_finder::pipeline;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            if args.quiet {
                EnvFilter::new("warn")
            } else {
                EnvFilter::new("info")
            }
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let inputs = args.inputs();
    let stats = pipeline::run(&inputs, &args.config())?;
    tracing::info!(
        total_records = stats.total_records,
        unmapped_records = stats.unmapped_records,
        candidate_reads = stats.candidate_reads,
        windows = stats.windows,
        groups = stats.groups,
        "fusion-finder: processing complete"
    );
    tracing::info!("{} fusion candidates identified.", stats.fusion_genes);
    tracing::info!(
        "Output written to: {}, {}",
        inputs.annotation_path().display(),
        inputs.group_path().display()
    );
    Ok(())
}
