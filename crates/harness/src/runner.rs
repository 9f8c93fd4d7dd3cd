use std::{
    fmt::Display,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use log::{info, warn};
use tokio::{fs, process::Command};

use crate::{layout::Layout, Error};

/// How a single invocation of the external program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Non-zero exit. The code is `None` if the program was terminated by a
    /// signal.
    Failed { code: Option<i32> },
    /// The program was killed after exceeding the configured timeout.
    TimedOut,
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Success)
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            RunStatus::Success
        } else {
            RunStatus::Failed {
                code: status.code(),
            }
        }
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => f.write_str("success"),
            RunStatus::Failed { code: Some(code) } => write!(f, "exit code {code}"),
            RunStatus::Failed { code: None } => f.write_str("terminated by signal"),
            RunStatus::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Runs the computation program on a graph file and captures its standard
/// output in a file.
#[async_trait]
pub trait Program: Send + Sync {
    /// Blocks until the program has finished. `output` is created or
    /// truncated before the program starts.
    async fn run(&self, graph: &Path, output: &Path) -> Result<RunStatus, Error>;
}

/// The external program, started as a child process with the graph file as
/// its only argument.
#[derive(Debug, Clone)]
pub struct ProcessProgram {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessProgram {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    /// Kills the program if it does not finish within `timeout`.
    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        Self { timeout, ..self }
    }
}

#[async_trait]
impl Program for ProcessProgram {
    async fn run(&self, graph: &Path, output: &Path) -> Result<RunStatus, Error> {
        let stdout = fs::File::create(output).await?.into_std().await;

        let mut child = Command::new(&self.executable)
            .arg(graph)
            .stdin(Stdio::null())
            .stdout(stdout)
            .kill_on_drop(true)
            .spawn()?;

        let status = match self.timeout {
            None => child.wait().await?.into(),
            Some(timeout) => {
                let waited = tokio::time::timeout(timeout, child.wait()).await;
                match waited {
                    Ok(status) => status?.into(),
                    Err(_) => {
                        child.kill().await?;
                        RunStatus::TimedOut
                    }
                }
            }
        };

        Ok(status)
    }
}

/// Benchmarks graph files, storing the program output below the results
/// directory of a [`Layout`].
pub struct BenchmarkRunner<'a, P: ?Sized> {
    layout: &'a Layout,
    program: &'a P,
}

impl<'a, P> BenchmarkRunner<'a, P>
where
    P: Program + ?Sized,
{
    pub fn new(layout: &'a Layout, program: &'a P) -> Self {
        Self { layout, program }
    }

    /// Runs the program on `graph` and returns the path of the captured
    /// output.
    ///
    /// A failing program is not an error: it is logged and whatever it
    /// printed before failing is kept. Only failing to prepare the results
    /// directory is reported to the caller.
    pub async fn run(&self, graph: &Path) -> Result<PathBuf, Error> {
        fs::create_dir_all(&self.layout.results_dir).await?;
        let results = self.layout.results_path(graph);

        info!("Benchmarking {:?}", graph);
        let start = Instant::now();

        match self.program.run(graph, &results).await {
            Ok(RunStatus::Success) => {
                info!("Finished {:?} in {:?}", graph, start.elapsed());
            }
            Ok(status) => {
                warn!(
                    "Program finished with {status} on {:?} after {:?}",
                    graph,
                    start.elapsed()
                );
            }
            Err(e) => {
                warn!("Could not run program on {:?}: {e}", graph);
                if !fs::try_exists(&results).await? {
                    fs::File::create(&results).await?;
                }
            }
        }

        Ok(results)
    }
}

/// The command that builds the external program, e.g. `make`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    program: String,
    args: Vec<String>,
}

impl Default for BuildCommand {
    fn default() -> Self {
        Self {
            program: String::from("make"),
            args: Vec::new(),
        }
    }
}

impl BuildCommand {
    /// Splits `command` on whitespace into program and arguments.
    pub fn parse(command: &str) -> Result<Self, Error> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(Error::EmptyBuildCommand)?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Runs the build and waits for it to finish.
    ///
    /// The outcome is logged but never fails the run: a broken build shows
    /// up as missing timings later on.
    pub async fn run(&self) -> RunStatus {
        info!("Building program with `{}`", self);
        let start = Instant::now();

        match Command::new(&self.program).args(&self.args).status().await {
            Ok(status) => {
                let status = RunStatus::from(status);
                if status.is_success() {
                    info!("Build finished in {:?}", start.elapsed());
                } else {
                    warn!("Build `{}` finished with {status}", self);
                }
                status
            }
            Err(e) => {
                warn!("Could not start build `{}`: {e}", self);
                RunStatus::Failed { code: None }
            }
        }
    }
}

impl Display for BuildCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
