use std::{fmt::Display, path::Path};

use itertools::Itertools;
use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt, BufWriter},
};

use crate::{catalog::Method, timing::Timings, Error};

/// The two kinds of comparison tables, differing only in their key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Rows keyed by the node count of a complete graph.
    Synthetic,
    /// Rows keyed by dataset name.
    Dataset,
}

impl ReportKind {
    fn key_header(&self) -> &'static str {
        match self {
            ReportKind::Synthetic => "N",
            ReportKind::Dataset => "Name",
        }
    }

    fn key_alignment(&self) -> &'static str {
        match self {
            ReportKind::Synthetic => ":-:",
            ReportKind::Dataset => ":----:",
        }
    }

    /// `| N | Naive time (s) | ... |`
    pub fn header(&self) -> String {
        table_row(
            std::iter::once(self.key_header().to_string())
                .chain(Method::ALL.iter().map(|method| format!("{method} time (s)"))),
        )
    }

    /// `|:-:|:-:|...|`
    pub fn alignment(&self) -> String {
        let cells = std::iter::once(self.key_alignment())
            .chain(Method::ALL.iter().map(|_| ":-:"))
            .join("|");
        format!("|{cells}|")
    }
}

/// A data row: the key followed by one cell per method, empty if the method
/// did not report a time.
pub fn row(key: impl Display, timings: &Timings) -> String {
    table_row(
        std::iter::once(key.to_string()).chain(
            Method::ALL
                .iter()
                .map(|method| timings.get(*method).unwrap_or_default().to_string()),
        ),
    )
}

fn table_row(cells: impl Iterator<Item = String>) -> String {
    let cells = cells.map(|cell| format!(" {cell} ")).join("|");
    format!("|{cells}|")
}

/// Writes a Markdown table row by row.
///
/// Creating a writer truncates an existing report. Every row is flushed
/// to disk immediately so a report can be followed while the run is in
/// progress.
pub struct ReportWriter {
    writer: BufWriter<File>,
    rows: usize,
}

impl ReportWriter {
    /// Creates the report and writes the header and alignment rows.
    pub async fn create(path: &Path, kind: ReportKind) -> Result<Self, Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut report = Self {
            writer: BufWriter::new(File::create(path).await?),
            rows: 0,
        };
        report.write_line(&kind.header()).await?;
        report.write_line(&kind.alignment()).await?;

        Ok(report)
    }

    pub async fn append(&mut self, key: impl Display, timings: &Timings) -> Result<(), Error> {
        self.write_line(&row(key, timings)).await?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    async fn write_line(&mut self, line: &str) -> Result<(), Error> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::timing::parse;

    use super::*;

    #[test]
    fn test_synthetic_header() {
        assert_eq!(
            ReportKind::Synthetic.header(),
            "| N | Naive time (s) | Burkhardt time (s) | Cohen time (s) | Sandia time (s) \
             | Sandia2 time (s) | SandiaDot time (s) | SandiaDot2 time (s) |"
        );
        assert_eq!(
            ReportKind::Synthetic.alignment(),
            "|:-:|:-:|:-:|:-:|:-:|:-:|:-:|:-:|"
        );
    }

    #[test]
    fn test_dataset_header() {
        assert!(ReportKind::Dataset.header().starts_with("| Name | Naive time (s) |"));
        assert_eq!(
            ReportKind::Dataset.alignment(),
            "|:----:|:-:|:-:|:-:|:-:|:-:|:-:|:-:|"
        );
    }

    #[test]
    fn test_row_with_missing_values() {
        let timings = parse(
            "Naive used time (in seconds): 0.0042\n\
             Cohen used time (in seconds): 1.2\n",
        );

        assert_eq!(
            row(100, &timings),
            "| 100 | 0.0042 |  | 1.2 |  |  |  |  |"
        );
        assert_eq!(
            row("amazon0302.txt", &Timings::default()),
            "| amazon0302.txt |  |  |  |  |  |  |  |"
        );
    }

    #[test]
    fn test_rows_have_a_cell_per_column() {
        let header_cells = ReportKind::Dataset.header().matches('|').count();
        let alignment_cells = ReportKind::Dataset.alignment().matches('|').count();
        let row_cells = row("x", &Timings::default()).matches('|').count();

        assert_eq!(header_cells, Method::ALL.len() + 2);
        assert_eq!(alignment_cells, header_cells);
        assert_eq!(row_cells, header_cells);
    }

    #[tokio::test]
    async fn test_writer_truncates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        fs::write(&path, "old content\n".repeat(10)).await.unwrap();

        let mut report = ReportWriter::create(&path, ReportKind::Synthetic)
            .await
            .unwrap();
        report.append(1, &Timings::default()).await.unwrap();
        report
            .append(2, &parse("Naive used time (in seconds): 0.1\n"))
            .await
            .unwrap();
        assert_eq!(report.rows(), 2);

        let content = fs::read_to_string(&path).await.unwrap();
        let lines = content.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], ReportKind::Synthetic.header());
        assert_eq!(lines[1], ReportKind::Synthetic.alignment());
        assert!(lines[2].starts_with("| 1 |"));
        assert!(lines[3].starts_with("| 2 | 0.1 |"));
        assert!(!content.contains("old content"));
    }
}
