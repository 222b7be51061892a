use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::DiscoveryConfig;
use crate::error::{LintError, Result};
use crate::utils::load_gitignore;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

struct PathFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PathFilter {
    fn new(config: &DiscoveryConfig) -> Result<Self> {
        Ok(Self {
            include: compile(&config.include)?,
            exclude: compile(&config.exclude)?,
        })
    }

    fn accepts(&self, relative: &Path) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| LintError::InvalidPattern {
                pattern: p.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Resolve input paths into the sorted list of files to lint.
///
/// Files named explicitly are always taken. Directories are walked and their
/// files filtered by the include/exclude patterns, matched against the path
/// relative to the directory.
pub fn discover(paths: &[PathBuf], config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let filter = PathFilter::new(config)?;
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(LintError::PathNotFound(path.clone()));
        }
        if path.is_file() {
            files.push(path.clone());
        } else {
            walk_directory(path, config, &filter, &mut files)?;
        }
    }

    files.sort();
    files.dedup();
    debug!(count = files.len(), "Discovered documents");
    Ok(files)
}

fn walk_directory(
    root: &Path,
    config: &DiscoveryConfig,
    filter: &PathFilter,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let gitignore = if config.respect_gitignore {
        load_gitignore(root)
    } else {
        None
    };

    let walker = WalkDir::new(root)
        .max_depth(config.max_depth)
        .follow_links(config.follow_links)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if let Some(gi) = &gitignore
            && gi.matched_path_or_any_parents(path, false).is_ignore()
        {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if filter.accepts(relative) {
            files.push(path.to_path_buf());
        }
    }

    Ok(())
}
