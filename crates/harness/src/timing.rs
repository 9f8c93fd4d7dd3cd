use std::{collections::BTreeMap, path::Path};

use log::{debug, warn};
use tokio::fs;

use crate::{catalog::Method, Error};

const TIME_MARKER: &str = " used time (in seconds): ";

/// The times reported by the program for one graph, keyed by method.
///
/// Values are kept verbatim as printed by the program. A method without a
/// value was not reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timings {
    times: BTreeMap<Method, String>,
}

impl Timings {
    pub fn get(&self, method: Method) -> Option<&str> {
        self.times.get(&method).map(String::as_str)
    }

    pub fn insert(&mut self, method: Method, time: impl Into<String>) {
        self.times.insert(method, time.into());
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Methods without a reported time, in report column order.
    pub fn missing(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL
            .into_iter()
            .filter(|method| !self.times.contains_key(method))
    }
}

/// Recovers the reported times from the captured output of the program.
///
/// A line counts only if it is exactly `<Method> used time (in seconds): <value>`
/// followed by a line break (`\n` or `\r\n`), where `<Method>` is one of
/// [`Method::ALL`].
/// Everything else is ignored. If a method is reported more than once, the
/// last report wins.
///
/// ```
/// use tricount_harness::{catalog::Method, timing::parse};
///
/// let timings = parse("loading graph\nCohen used time (in seconds): 1.2\n");
///
/// assert_eq!(timings.get(Method::Cohen), Some("1.2"));
/// assert_eq!(timings.get(Method::Naive), None);
/// ```
pub fn parse(output: &str) -> Timings {
    let mut timings = Timings::default();

    for line in output.split_inclusive('\n') {
        let Some(line) = line.strip_suffix('\n') else {
            continue;
        };
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some((name, time)) = line.split_once(TIME_MARKER) else {
            continue;
        };
        if let Ok(method) = name.parse::<Method>() {
            timings.insert(method, time);
        }
    }

    timings
}

/// Reads a results file and extracts the reported times.
///
/// Bytes that are not valid UTF-8 are replaced before parsing, they can
/// never be part of a matching line.
pub async fn extract(results: &Path) -> Result<Timings, Error> {
    let output = fs::read(results).await?;
    let timings = parse(&String::from_utf8_lossy(&output));

    debug!("Extracted timings from {:?}: {:?}", results, timings);

    Ok(timings)
}

/// Logs one warning per method without a reported time.
pub fn warn_missing(graph: &str, timings: &Timings) {
    for method in timings.missing() {
        warn!("No time reported for {method} on {graph}");
    }
}
