use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// A source file after reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedFile {
    Text { path: PathBuf, content: String },
    Unreadable { path: PathBuf, reason: String },
}

impl LoadedFile {
    pub fn path(&self) -> &Path {
        match self {
            Self::Text { path, .. } | Self::Unreadable { path, .. } => path,
        }
    }
}

/// Read `paths` with at most `concurrency` reads in flight, preserving order.
///
/// Failures are captured per file so one bad file does not abort the run.
pub async fn load_files(paths: Vec<PathBuf>, concurrency: usize) -> Vec<LoadedFile> {
    let files: Vec<LoadedFile> = stream::iter(paths)
        .map(load_file)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    debug!(count = files.len(), "Loaded files");
    files
}

pub async fn load_file(path: PathBuf) -> LoadedFile {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read file");
            return LoadedFile::Unreadable {
                path,
                reason: e.to_string(),
            };
        }
    };

    match String::from_utf8(bytes) {
        Ok(content) => LoadedFile::Text { path, content },
        Err(e) => LoadedFile::Unreadable {
            path,
            reason: format!("not valid UTF-8 ({})", e.utf8_error()),
        },
    }
}
