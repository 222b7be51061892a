use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use tokio::fs;

use crate::error::{LintError, Result};

/// Load and parse .gitignore from a directory.
/// Returns None if .gitignore doesn't exist or fails to parse.
pub fn load_gitignore(working_dir: &Path) -> Option<Gitignore> {
    let gitignore_path = working_dir.join(".gitignore");
    if !gitignore_path.exists() {
        return None;
    }

    let mut builder = GitignoreBuilder::new(working_dir);
    if builder.add(&gitignore_path).is_some() {
        return None;
    }
    builder.build().ok()
}

/// Write `content` to `path`, refusing to replace an existing file unless `force`.
pub async fn write_file(path: &Path, content: &str, force: bool) -> Result<()> {
    if !force && fs::try_exists(path).await? {
        return Err(LintError::OutputExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, content).await?;
    Ok(())
}
