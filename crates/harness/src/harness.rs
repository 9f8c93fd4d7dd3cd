use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::{error, info};

use crate::{
    catalog::Catalog,
    input::{ensure_complete_graph, Acquirer, Fetch, HttpFetcher, Materialized},
    layout::Layout,
    report::{ReportKind, ReportWriter},
    runner::{BenchmarkRunner, BuildCommand, ProcessProgram, Program},
    timing::{self, Timings},
    Error,
};

/// Static configuration of a harness.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub layout: Layout,
    /// The computation program, invoked as `<program> <graph file>`.
    pub program: PathBuf,
    pub build: BuildCommand,
    /// Upper bound for a single program run. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Continue with the remaining datasets if one cannot be acquired.
    pub keep_going: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            program: PathBuf::from("./main"),
            build: BuildCommand::default(),
            timeout: None,
            keep_going: false,
        }
    }
}

/// Bounds for a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub skip_build: bool,
    /// Largest complete graph to generate and benchmark. Defaults to the
    /// largest size of the catalog.
    pub max_size: Option<usize>,
    /// Number of datasets to benchmark, in catalog order. Defaults to all.
    pub max_datasets: Option<usize>,
}

/// Drives acquisition, generation, benchmarking and reporting.
///
/// All steps run sequentially: no two graphs are ever processed at the
/// same time.
pub struct Harness<F = HttpFetcher, P = ProcessProgram> {
    config: HarnessConfig,
    catalog: Catalog,
    fetcher: F,
    program: P,
}

impl Harness {
    /// A harness that downloads datasets over HTTP and runs the configured
    /// program as a child process.
    pub fn new(config: HarnessConfig, catalog: Catalog) -> Self {
        let program = ProcessProgram::new(&config.program).with_timeout(config.timeout);
        Self::with_capabilities(config, catalog, HttpFetcher::new(), program)
    }
}

impl<F, P> Harness<F, P>
where
    F: Fetch,
    P: Program,
{
    pub fn with_capabilities(
        config: HarnessConfig,
        catalog: Catalog,
        fetcher: F,
        program: P,
    ) -> Self {
        Self {
            config,
            catalog,
            fetcher,
            program,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn program(&self) -> &P {
        &self.program
    }

    /// Performs the complete pipeline: build, acquire, generate and report.
    pub async fn run(&self, options: RunOptions) -> Result<(), Error> {
        if options.skip_build {
            info!("Skipping build");
        } else {
            self.config.build.run().await;
        }

        let max_size = options
            .max_size
            .or_else(|| self.catalog.max_size())
            .unwrap_or_default();

        self.acquire_all().await?;
        self.generate_all(max_size).await?;
        self.synthetic_report(max_size).await?;
        self.dataset_report(options.max_datasets).await?;

        Ok(())
    }

    /// Acquires every dataset of the catalog and returns how many were
    /// downloaded.
    ///
    /// The first failure aborts the phase unless `keep_going` is configured,
    /// in which case failures are logged and skipped.
    pub async fn acquire_all(&self) -> Result<usize, Error> {
        let acquirer = Acquirer::new(&self.config.layout, &self.fetcher);
        let mut created = 0;

        for dataset in self.catalog.datasets() {
            match acquirer.ensure(dataset).await {
                Ok(outcome) => created += usize::from(outcome.created()),
                Err(e) if self.config.keep_going => {
                    error!("Could not acquire {}: {e}", dataset.name);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Acquired {created} of {} datasets",
            self.catalog.datasets().len()
        );

        Ok(created)
    }

    /// Generates the complete graphs for all sizes up to `max_size` and
    /// returns how many files were written.
    pub async fn generate_all(&self, max_size: usize) -> Result<usize, Error> {
        let mut created = 0;

        for n in self.catalog.sizes_up_to(max_size) {
            let path = self.config.layout.synthetic_path(n);
            if ensure_complete_graph(&path, n).await? == Materialized::Created {
                created += 1;
            }
        }

        info!("Generated {created} complete graphs");

        Ok(created)
    }

    /// Benchmarks the complete graphs with up to `max_size` nodes and writes
    /// the synthetic report. Returns the number of rows.
    pub async fn synthetic_report(&self, max_size: usize) -> Result<usize, Error> {
        let layout = &self.config.layout;
        let mut report =
            ReportWriter::create(&layout.synthetic_report(), ReportKind::Synthetic).await?;

        for n in self.catalog.sizes_up_to(max_size) {
            let timings = self
                .benchmark(&layout.synthetic_path(n), &n.to_string())
                .await?;
            report.append(n, &timings).await?;
        }

        info!(
            "Wrote {} rows to {:?}",
            report.rows(),
            layout.synthetic_report()
        );

        Ok(report.rows())
    }

    /// Benchmarks the first `max_datasets` datasets, or all if `None`, and
    /// writes the dataset report. Returns the number of rows.
    pub async fn dataset_report(&self, max_datasets: Option<usize>) -> Result<usize, Error> {
        let layout = &self.config.layout;
        let mut report =
            ReportWriter::create(&layout.dataset_report(), ReportKind::Dataset).await?;

        let limit = max_datasets.unwrap_or(usize::MAX);
        for dataset in self.catalog.datasets().iter().take(limit) {
            let timings = self
                .benchmark(&layout.dataset_path(dataset), &dataset.name)
                .await?;
            report.append(&dataset.name, &timings).await?;
        }

        info!(
            "Wrote {} rows to {:?}",
            report.rows(),
            layout.dataset_report()
        );

        Ok(report.rows())
    }

    async fn benchmark(&self, graph: &Path, key: &str) -> Result<Timings, Error> {
        let runner = BenchmarkRunner::new(&self.config.layout, &self.program);
        let results = runner.run(graph).await?;
        let timings = timing::extract(&results).await?;
        timing::warn_missing(key, &timings);
        Ok(timings)
    }
}
