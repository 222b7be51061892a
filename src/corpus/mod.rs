//! Corpus discovery and loading.
//!
//! - `discover`: expand input paths into the files to lint
//! - `load_files`: bounded concurrent reads
//! - `Corpus`: every file split and parsed into `SkillDocument`s

mod discovery;
mod loader;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::LintConfig;
use crate::document::{SkillDocument, parse_source};
use crate::error::Result;

pub use discovery::discover;
pub use loader::{LoadedFile, load_file, load_files};

#[derive(Debug, Clone)]
pub enum CorpusFile {
    Parsed {
        path: PathBuf,
        documents: Vec<SkillDocument>,
    },
    Unreadable {
        path: PathBuf,
        reason: String,
    },
}

impl CorpusFile {
    pub fn path(&self) -> &Path {
        match self {
            Self::Parsed { path, .. } | Self::Unreadable { path, .. } => path,
        }
    }

    pub fn documents(&self) -> &[SkillDocument] {
        match self {
            Self::Parsed { documents, .. } => documents,
            Self::Unreadable { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    files: Vec<CorpusFile>,
}

impl Corpus {
    /// Split and parse loaded files. `separator` is the bundle separator token.
    pub fn build(files: Vec<LoadedFile>, separator: &str) -> Self {
        let files: Vec<CorpusFile> = files
            .into_iter()
            .map(|file| match file {
                LoadedFile::Text { path, content } => {
                    let documents = parse_source(&path, &content, separator);
                    if documents.len() > 1 {
                        debug!(path = %path.display(), documents = documents.len(), "Split bundle");
                    }
                    CorpusFile::Parsed { path, documents }
                }
                LoadedFile::Unreadable { path, reason } => CorpusFile::Unreadable { path, reason },
            })
            .collect();

        Self { files }
    }

    /// Discover, read and parse everything under `paths`.
    pub async fn load(paths: &[PathBuf], config: &LintConfig) -> Result<Self> {
        let files = discover(paths, &config.discovery)?;
        let loaded = load_files(files, config.discovery.read_concurrency).await;
        Ok(Self::build(loaded, &config.bundle.separator))
    }

    pub fn files(&self) -> &[CorpusFile] {
        &self.files
    }

    pub fn documents(&self) -> impl Iterator<Item = &SkillDocument> {
        self.files.iter().flat_map(CorpusFile::documents)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents().count()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
