use anyhow::Context;
use clap::Parser;
use surge::resource::{HeapSampler, TrackingAllocator};
use surge_bench::args::Cli;
use surge_bench::orchestrator;
use surge_bench::orchestrator::print::{Header, Separator, Summary, Theory};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let sweep = cli.sweep().context("invalid sweep configuration")?;
    println!("{}", Theory(&sweep));

    let reports = orchestrator::run(&sweep, &HeapSampler);
    println!("{}", Separator());
    println!("{}", Header());
    println!("{}", Separator());
    for report in &reports {
        println!("{report}");
    }
    println!("{}", Separator());
    println!();
    println!("{}", Summary());

    orchestrator::outcome(&reports)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "surge=debug,surge_bench=debug" } else { "surge=info,surge_bench=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
