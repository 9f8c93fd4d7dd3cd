use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use crate::Error;

/// A triangle counting implementation exercised by the external program.
///
/// The order of [`Method::ALL`] is the column order of every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Naive,
    Burkhardt,
    Cohen,
    Sandia,
    Sandia2,
    SandiaDot,
    SandiaDot2,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Naive,
        Method::Burkhardt,
        Method::Cohen,
        Method::Sandia,
        Method::Sandia2,
        Method::SandiaDot,
        Method::SandiaDot2,
    ];

    /// The name under which the external program reports this method.
    pub const fn name(&self) -> &'static str {
        match self {
            Method::Naive => "Naive",
            Method::Burkhardt => "Burkhardt",
            Method::Cohen => "Cohen",
            Method::Sandia => "Sandia",
            Method::Sandia2 => "Sandia2",
            Method::SandiaDot => "SandiaDot",
            Method::SandiaDot2 => "SandiaDot2",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

/// A remote edge list, identified by the local file name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub url: String,
}

impl Dataset {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

const SNAP_DATASETS: [(&str, &str); 9] = [
    (
        "loc-brightkite_edges.txt",
        "http://snap.stanford.edu/data/loc-brightkite_edges.txt.gz",
    ),
    (
        "amazon0302.txt",
        "https://snap.stanford.edu/data/amazon0302.txt.gz",
    ),
    (
        "roadNet-PA.txt",
        "https://snap.stanford.edu/data/roadNet-PA.txt.gz",
    ),
    (
        "amazon0505.txt",
        "https://snap.stanford.edu/data/amazon0505.txt.gz",
    ),
    (
        "soc-Epinions1.txt",
        "https://snap.stanford.edu/data/soc-Epinions1.txt.gz",
    ),
    (
        "email-EuAll.txt",
        "https://snap.stanford.edu/data/email-EuAll.txt.gz",
    ),
    (
        "loc-gowalla_edges.txt",
        "https://snap.stanford.edu/data/loc-gowalla_edges.txt.gz",
    ),
    (
        "soc-Slashdot0902.txt",
        "https://snap.stanford.edu/data/soc-Slashdot0902.txt.gz",
    ),
    (
        "soc-Slashdot0811.txt",
        "https://snap.stanford.edu/data/soc-Slashdot0811.txt.gz",
    ),
];

/// Decades covered by the default size sequence: `1` up to `9000`.
pub const DEFAULT_DECADES: RangeInclusive<u32> = 0..=3;

/// Samples graph sizes across orders of magnitude.
///
/// For every decade exponent `p` the values `10^p, 2·10^p, …, 9·10^p` are
/// emitted in ascending order.
///
/// ```
/// use tricount_harness::catalog::size_sequence;
///
/// assert_eq!(size_sequence(0..=1), vec![
///     1, 2, 3, 4, 5, 6, 7, 8, 9,
///     10, 20, 30, 40, 50, 60, 70, 80, 90,
/// ]);
/// ```
pub fn size_sequence(decades: RangeInclusive<u32>) -> Vec<usize> {
    decades
        .flat_map(|p| {
            let step = 10_usize.pow(p);
            (1..10).map(move |factor| factor * step)
        })
        .collect()
}

/// The fixed set of graphs a run is performed on.
///
/// A catalog is built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    datasets: Vec<Dataset>,
    sizes: Vec<usize>,
}

impl Default for Catalog {
    fn default() -> Self {
        let datasets = SNAP_DATASETS
            .iter()
            .map(|(name, url)| Dataset::new(*name, *url))
            .collect();

        Self::new(datasets, size_sequence(DEFAULT_DECADES))
    }
}

impl Catalog {
    pub fn new(datasets: Vec<Dataset>, sizes: Vec<usize>) -> Self {
        Self { datasets, sizes }
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Sizes up to and including `ceiling`, in sequence order.
    pub fn sizes_up_to(&self, ceiling: usize) -> impl Iterator<Item = usize> + '_ {
        self.sizes.iter().copied().filter(move |&n| n <= ceiling)
    }

    /// The largest size of the sequence, if any.
    pub fn max_size(&self) -> Option<usize> {
        self.sizes.iter().copied().max()
    }
}
