use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::{catalog::Dataset, Error};

const SYNTHETIC_DIR: &str = "FullGraph";
const SYNTHETIC_REPORT: &str = "fullgraph_results.md";
const DATASET_REPORT: &str = "stanford_graph_results.md";

/// Where graph files, captured program output and reports are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub input_dir: PathBuf,
    pub results_dir: PathBuf,
    pub report_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
            results_dir: PathBuf::from("./results"),
            report_dir: PathBuf::from("."),
        }
    }
}

impl Layout {
    /// Places all directories and reports below `root`.
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            input_dir: root.join("input"),
            results_dir: root.join("results"),
            report_dir: root.to_path_buf(),
        }
    }

    pub fn synthetic_dir(&self) -> PathBuf {
        self.input_dir.join(SYNTHETIC_DIR)
    }

    /// The canonical graph file of a dataset.
    pub fn dataset_path(&self, dataset: &Dataset) -> PathBuf {
        self.input_dir.join(&dataset.name)
    }

    /// The file the compressed archive of a dataset is downloaded to.
    ///
    /// Named after the last path segment of the dataset url, falling back to
    /// `<name>.gz` for urls without one or if the segment would collide with
    /// the canonical graph file.
    pub fn archive_path(&self, dataset: &Dataset) -> Result<PathBuf, Error> {
        let url = Url::parse(&dataset.url).map_err(|_| Error::InvalidUrl {
            url: dataset.url.clone(),
        })?;

        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty() && *segment != dataset.name)
            .map_or_else(|| format!("{}.gz", dataset.name), str::to_string);

        Ok(self.input_dir.join(file_name))
    }

    /// The complete graph with `n` nodes.
    pub fn synthetic_path(&self, n: usize) -> PathBuf {
        self.synthetic_dir().join(format!("fullgraph_{n}.txt"))
    }

    /// The file the program output for `graph` is captured in.
    pub fn results_path(&self, graph: &Path) -> PathBuf {
        match graph.file_name() {
            Some(name) => self.results_dir.join(name),
            None => self.results_dir.join("unnamed"),
        }
    }

    pub fn synthetic_report(&self) -> PathBuf {
        self.report_dir.join(SYNTHETIC_REPORT)
    }

    pub fn dataset_report(&self) -> PathBuf {
        self.report_dir.join(DATASET_REPORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = Layout::default();
        let dataset = Dataset::new(
            "amazon0302.txt",
            "https://snap.stanford.edu/data/amazon0302.txt.gz",
        );

        assert_eq!(
            layout.dataset_path(&dataset),
            PathBuf::from("./input/amazon0302.txt")
        );
        assert_eq!(
            layout.archive_path(&dataset).unwrap(),
            PathBuf::from("./input/amazon0302.txt.gz")
        );
        assert_eq!(
            layout.synthetic_path(42),
            PathBuf::from("./input/FullGraph/fullgraph_42.txt")
        );
        assert_eq!(
            layout.synthetic_report(),
            PathBuf::from("./fullgraph_results.md")
        );
        assert_eq!(
            layout.dataset_report(),
            PathBuf::from("./stanford_graph_results.md")
        );
    }

    #[test]
    fn test_results_path_uses_base_name() {
        let layout = Layout::rooted_at("/tmp/run");

        assert_eq!(
            layout.results_path(&layout.synthetic_path(7)),
            PathBuf::from("/tmp/run/results/fullgraph_7.txt")
        );
        assert_eq!(
            layout.results_path(Path::new("/data/soc-Epinions1.txt")),
            PathBuf::from("/tmp/run/results/soc-Epinions1.txt")
        );
    }

    #[test]
    fn test_archive_path_fallback() {
        let layout = Layout::rooted_at("/tmp/run");
        let dataset = Dataset::new("edges.txt", "https://example.com/");

        assert_eq!(
            layout.archive_path(&dataset).unwrap(),
            PathBuf::from("/tmp/run/input/edges.txt.gz")
        );
    }

    #[test]
    fn test_archive_path_never_shadows_graph_file() {
        let layout = Layout::rooted_at("/tmp/run");
        let dataset = Dataset::new("edges.txt", "https://example.com/edges.txt");

        assert_eq!(
            layout.archive_path(&dataset).unwrap(),
            PathBuf::from("/tmp/run/input/edges.txt.gz")
        );
    }

    #[test]
    fn test_invalid_url() {
        let layout = Layout::default();
        let dataset = Dataset::new("edges.txt", "not a url");

        assert!(matches!(
            layout.archive_path(&dataset),
            Err(Error::InvalidUrl { url }) if url == "not a url"
        ));
    }
}
