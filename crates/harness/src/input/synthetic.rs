use std::{fmt::Write as _, path::Path, time::Instant};

use log::{debug, info};
use num_format::{Locale, ToFormattedString};
use tokio::{
    fs::{self, File},
    io::{AsyncWrite, AsyncWriteExt, BufWriter},
};

use crate::Error;

use super::{partial_path, Materialized};

/// Writes the edge list of the complete undirected graph with `n` nodes to
/// `path` unless that file exists already.
///
/// Every unordered pair `(i, j)` with `0 <= i < j < n` is written exactly
/// once, ordered lexicographically, resulting in `n * (n - 1) / 2` lines.
/// The file only appears at `path` once it is complete.
pub async fn ensure_complete_graph(path: &Path, n: usize) -> Result<Materialized, Error> {
    if fs::try_exists(path).await? {
        debug!("Found {:?}, skipping generation", path);
        return Ok(Materialized::Present);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let start = Instant::now();
    let partial = partial_path(path);
    let edges = match write_file(&partial, n).await {
        Ok(edges) => edges,
        Err(e) => {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }
    };
    debug_assert_eq!(edges, complete_graph_edge_count(n) as u64);

    fs::rename(&partial, path).await?;

    info!(
        "Generated complete graph with {} nodes and {} edges in {:?}",
        n.to_formatted_string(&Locale::en),
        edges.to_formatted_string(&Locale::en),
        start.elapsed()
    );

    Ok(Materialized::Created)
}

async fn write_file(path: &Path, n: usize) -> Result<u64, Error> {
    let mut writer = BufWriter::new(File::create(path).await?);
    write_complete_graph(&mut writer, n).await
}

/// Writes all pairs `i j` with `i < j < n` and returns the number of lines.
pub async fn write_complete_graph<W>(writer: &mut W, n: usize) -> Result<u64, Error>
where
    W: AsyncWrite + Unpin,
{
    let mut edges = 0_u64;
    let mut line = String::new();

    for i in 0..n {
        for j in i + 1..n {
            line.clear();
            let _ = writeln!(line, "{i} {j}");
            writer.write_all(line.as_bytes()).await?;
            edges += 1;
        }
    }

    writer.flush().await?;

    Ok(edges)
}

/// Number of edges of the complete graph with `n` nodes.
pub const fn complete_graph_edge_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    async fn generate(n: usize) -> String {
        let mut buf = Vec::new();
        write_complete_graph(&mut buf, n).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_small_complete_graphs() {
        assert_eq!(generate(0).await, "");
        assert_eq!(generate(1).await, "");
        assert_eq!(generate(2).await, "0 1\n");
        assert_eq!(generate(3).await, "0 1\n0 2\n1 2\n");
        assert_eq!(generate(4).await, "0 1\n0 2\n0 3\n1 2\n1 3\n2 3\n");
    }

    #[tokio::test]
    async fn test_complete_graph_property() {
        for n in [5, 9, 20, 70] {
            let content = generate(n).await;
            let pairs = content
                .lines()
                .map(|line| {
                    let (i, j) = line.split_once(' ').unwrap();
                    (i.parse::<usize>().unwrap(), j.parse::<usize>().unwrap())
                })
                .collect::<Vec<_>>();

            assert_eq!(pairs.len(), n * (n - 1) / 2);
            assert_eq!(pairs.len(), complete_graph_edge_count(n));
            assert!(pairs.iter().all(|&(i, j)| i < j && j < n));

            let unique = pairs.iter().copied().collect::<HashSet<_>>();
            assert_eq!(unique.len(), pairs.len());

            let mut sorted = pairs.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, pairs);
        }
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FullGraph").join("fullgraph_6.txt");

        assert_eq!(
            ensure_complete_graph(&path, 6).await.unwrap(),
            Materialized::Created
        );
        let first = fs::read_to_string(&path).await.unwrap();
        assert_eq!(first.lines().count(), 15);

        assert_eq!(
            ensure_complete_graph(&path, 6).await.unwrap(),
            Materialized::Present
        );
        assert_eq!(fs::read_to_string(&path).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_existing_file_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fullgraph_3.txt");
        fs::write(&path, "stale\n").await.unwrap();

        assert_eq!(
            ensure_complete_graph(&path, 3).await.unwrap(),
            Materialized::Present
        );
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "stale\n");
    }

    #[tokio::test]
    async fn test_interrupted_generation_is_redone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fullgraph_3000.txt");

        let generation = tokio::spawn({
            let path = path.clone();
            async move { ensure_complete_graph(&path, 3000).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(30)).await;
        generation.abort();
        let _ = generation.await;

        assert!(!fs::try_exists(&path).await.unwrap());

        assert_eq!(
            ensure_complete_graph(&path, 3000).await.unwrap(),
            Materialized::Created
        );
        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), complete_graph_edge_count(3000));
        assert_eq!(content.lines().last(), Some("2998 2999"));
        assert!(!partial_path(&path).exists());
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fullgraph_4.txt");
        // a directory in place of the partial file makes the write fail
        fs::create_dir(partial_path(&path)).await.unwrap();

        assert!(ensure_complete_graph(&path, 4).await.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_edge_count() {
        assert_eq!(complete_graph_edge_count(0), 0);
        assert_eq!(complete_graph_edge_count(1), 0);
        assert_eq!(complete_graph_edge_count(9000), 40_495_500);
    }
}
