//! A harness that benchmarks triangle counting implementations on real-world
//! networks and on synthetic complete graphs.
//!
//! The harness does not count triangles itself. It prepares edge list files,
//! invokes an externally built program once per graph and collects the
//! timings that program reports on standard output. The program is expected
//! to print one line per method it ran:
//!
//! ```text
//! Naive used time (in seconds): 0.0042
//! Cohen used time (in seconds): 1.2
//! ```
//!
//! Timings are aggregated into two Markdown tables, one for complete graphs of
//! increasing size and one for the datasets of the [`Catalog`].
//!
//! # Pipeline
//!
//! A complete run consists of the following steps, executed strictly one
//! after the other:
//!
//! 1. build the external program (e.g. `make`),
//! 2. download and normalize every catalogued dataset,
//! 3. generate the complete graphs for every size in the size sequence,
//! 4. benchmark each synthetic graph and write the synthetic report,
//! 5. benchmark each dataset and write the dataset report.
//!
//! Input files are materialized only if they are not present yet, so an
//! interrupted run can simply be restarted.
//!
//! ```no_run
//! use tricount_harness::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let harness = Harness::new(HarnessConfig::default(), Catalog::default());
//! harness.run(RunOptions::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Capabilities
//!
//! Fetching remote archives and running the external program are hidden
//! behind the [`Fetch`](crate::input::dataset::Fetch) and
//! [`Program`](crate::runner::Program) traits. The default implementations
//! use HTTP and a child process; tests substitute in-memory fakes via
//! [`Harness::with_capabilities`].

pub mod catalog;
pub mod harness;
pub mod input;
pub mod layout;
pub mod prelude;
pub mod report;
pub mod runner;
pub mod timing;

pub use crate::catalog::Catalog;
pub use crate::harness::Harness;
pub use crate::harness::HarnessConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error while accessing the file system")]
    IoError {
        #[from]
        source: std::io::Error,
    },
    #[error("error while fetching {url}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid dataset url {url:?}")]
    InvalidUrl { url: String },
    #[error("unknown method {0:?}")]
    UnknownMethod(String),
    #[error("build command must not be empty")]
    EmptyBuildCommand,
}
