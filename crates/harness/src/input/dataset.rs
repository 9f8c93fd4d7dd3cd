use std::{io, path::Path, time::Instant};

use async_compression::tokio::bufread::GzipDecoder;
use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info};
use num_format::{Locale, ToFormattedString};
use tokio::{
    fs::{self, File},
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter},
};
use tokio_util::io::StreamReader;

use crate::{catalog::Dataset, layout::Layout, Error};

use super::{partial_path, Materialized};

/// Downloads a remote resource to a local file.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Stores the resource at `url` in `destination`, replacing any existing
    /// file.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), Error>;
}

/// Fetches resources over HTTP(S), streaming the body to disk.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), Error> {
        let fetch_error = |source: reqwest::Error| Error::FetchError {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;

        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        let reader = StreamReader::new(body);
        futures::pin_mut!(reader);

        let mut file = File::create(destination).await?;
        let bytes = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;

        debug!(
            "Fetched {} bytes from {url}",
            bytes.to_formatted_string(&Locale::en)
        );

        Ok(())
    }
}

/// Turns a dataset descriptor into a canonical graph file.
///
/// The canonical file is the decompressed archive without comment lines
/// (lines starting with `#`) and with every tab replaced by a single space.
/// Acquisition is skipped entirely if the canonical file exists already.
pub struct Acquirer<'a, F: ?Sized> {
    layout: &'a Layout,
    fetcher: &'a F,
}

impl<'a, F> Acquirer<'a, F>
where
    F: Fetch + ?Sized,
{
    pub fn new(layout: &'a Layout, fetcher: &'a F) -> Self {
        Self { layout, fetcher }
    }

    pub async fn ensure(&self, dataset: &Dataset) -> Result<Materialized, Error> {
        let target = self.layout.dataset_path(dataset);

        if fs::try_exists(&target).await? {
            debug!("Found {:?}, skipping download", target);
            return Ok(Materialized::Present);
        }

        let start = Instant::now();
        fs::create_dir_all(&self.layout.input_dir).await?;

        let archive = self.layout.archive_path(dataset)?;
        info!("Downloading {} from {}", dataset.name, dataset.url);
        self.fetcher.fetch(&dataset.url, &archive).await?;

        let partial = partial_path(&target);
        let lines = match normalize(&archive, &partial).await {
            Ok(lines) => lines,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        fs::rename(&partial, &target).await?;
        fs::remove_file(&archive).await?;

        info!(
            "Acquired {} ({} lines) in {:?}",
            dataset.name,
            lines.to_formatted_string(&Locale::en),
            start.elapsed()
        );

        Ok(Materialized::Created)
    }
}

/// Decompresses a gzip archive into `target`, dropping comment lines,
/// replacing tabs with spaces and CRLF line breaks with LF. Returns the
/// number of lines written.
async fn normalize(archive: &Path, target: &Path) -> Result<u64, Error> {
    let mut decoder = GzipDecoder::new(BufReader::new(File::open(archive).await?));
    decoder.multiple_members(true);

    let mut reader = BufReader::new(decoder);
    let mut writer = BufWriter::new(File::create(target).await?);

    let mut line = Vec::new();
    let mut lines = 0_u64;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        if normalize_line(&mut line) {
            writer.write_all(&line).await?;
            lines += 1;
        }
    }

    writer.flush().await?;

    Ok(lines)
}

/// Returns `false` for comment lines, otherwise replaces tabs and a CRLF
/// line break in place.
fn normalize_line(line: &mut Vec<u8>) -> bool {
    if line.starts_with(b"#") {
        return false;
    }

    if line.ends_with(b"\r\n") {
        line.truncate(line.len() - 2);
        line.push(b'\n');
    }

    line.iter_mut()
        .filter(|byte| **byte == b'\t')
        .for_each(|byte| *byte = b' ');

    true
}
