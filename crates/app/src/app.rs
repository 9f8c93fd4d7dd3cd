use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use tricount_harness::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let options = args.run_options();
    let config = args.config()?;
    info!("Running with {:?}", config);

    let harness = Harness::new(config, Catalog::default());
    harness.run(options).await?;

    Ok(())
}

/// Benchmarks triangle counting implementations on complete graphs and
/// real-world networks.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory for downloaded and generated graph files.
    #[arg(long, default_value = "./input")]
    input_dir: PathBuf,

    /// Directory for the captured program output.
    #[arg(long, default_value = "./results")]
    results_dir: PathBuf,

    /// Directory the Markdown reports are written to.
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// The program that counts triangles, called with a graph file.
    #[arg(short, long, default_value = "./main")]
    program: PathBuf,

    /// Command that builds the program.
    #[arg(long, default_value = "make")]
    build_command: String,

    /// Do not run the build command.
    #[arg(long)]
    skip_build: bool,

    /// Largest complete graph to generate and benchmark.
    #[arg(long)]
    max_size: Option<usize>,

    /// Benchmark only the first datasets of the catalog.
    #[arg(long)]
    max_datasets: Option<usize>,

    /// Kill a program run after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Skip datasets that cannot be downloaded instead of aborting.
    #[arg(long)]
    keep_going: bool,

    /// Increase logging verbosity.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=-3 => LevelFilter::Off,
            -2 => LevelFilter::Error,
            -1 => LevelFilter::Warn,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn config(&self) -> Result<HarnessConfig, Error> {
        Ok(HarnessConfig {
            layout: Layout {
                input_dir: self.input_dir.clone(),
                results_dir: self.results_dir.clone(),
                report_dir: self.report_dir.clone(),
            },
            program: self.program.clone(),
            build: BuildCommand::parse(&self.build_command)?,
            timeout: self.timeout_secs.map(Duration::from_secs),
            keep_going: self.keep_going,
        })
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            skip_build: self.skip_build,
            max_size: self.max_size,
            max_datasets: self.max_datasets,
        }
    }
}
