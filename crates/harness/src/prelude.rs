pub use crate::catalog::size_sequence;
pub use crate::catalog::Catalog;
pub use crate::catalog::Dataset;
pub use crate::catalog::Method;

pub use crate::harness::Harness;
pub use crate::harness::HarnessConfig;
pub use crate::harness::RunOptions;

pub use crate::input::ensure_complete_graph;
pub use crate::input::Acquirer;
pub use crate::input::Fetch;
pub use crate::input::HttpFetcher;
pub use crate::input::Materialized;

pub use crate::layout::Layout;

pub use crate::report::ReportKind;
pub use crate::report::ReportWriter;

pub use crate::runner::BenchmarkRunner;
pub use crate::runner::BuildCommand;
pub use crate::runner::ProcessProgram;
pub use crate::runner::Program;
pub use crate::runner::RunStatus;

pub use crate::timing::Timings;

pub use crate::Error;
