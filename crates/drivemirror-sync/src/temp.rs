//! Scoped temporary downloads
//!
//! A [`TempDownload`] owns a `NamedTempFile`. The file is removed when the
//! guard is dropped, whether the caller finished normally, returned early
//! with an error, or unwound from a panic.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

/// Prefix for temporary file names
const TEMP_PREFIX: &str = "drivemirror-";

/// Downloaded content parked in a temporary file
#[derive(Debug)]
pub struct TempDownload {
    file: NamedTempFile,
}

impl TempDownload {
    /// Writes `data` to a fresh temporary file
    ///
    /// `dir` selects the directory (system temp dir when `None`). `suffix` is
    /// appended to the generated name, e.g. `".csv"`.
    pub async fn write(dir: Option<PathBuf>, suffix: String, data: Vec<u8>) -> io::Result<Self> {
        let file = tokio::task::spawn_blocking(move || -> io::Result<NamedTempFile> {
            let mut builder = tempfile::Builder::new();
            builder.prefix(TEMP_PREFIX).suffix(&suffix);
            let mut file = match dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };
            file.write_all(&data)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(io::Error::other)??;

        debug!(path = %file.path().display(), "Created temporary download");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the file back and summarizes it as text
    pub async fn preview(&self) -> io::Result<TextPreview> {
        let data = tokio::fs::read(self.path()).await?;
        Ok(TextPreview::from_bytes(&data))
    }
}

/// Size, line count and first line of a text file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPreview {
    pub bytes: u64,
    pub lines: usize,
    /// First line without its terminator; `None` for empty content
    pub header: Option<String>,
}

impl TextPreview {
    /// Builds a preview; invalid UTF-8 is replaced, never rejected
    pub fn from_bytes(data: &[u8]) -> Self {
        let text = String::from_utf8_lossy(data);
        let header = text
            .lines()
            .next()
            .map(|line| line.trim_end_matches('\r').to_string());
        Self {
            bytes: data.len() as u64,
            lines: text.lines().count(),
            header,
        }
    }
}
