//! Skill tree fixtures for creating temporary document layouts.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const SEPARATOR: &str = "<!-- skill-separator -->";

/// Builds the text of one skill document.
#[derive(Debug, Clone, Default)]
pub struct SkillDoc {
    keys: Vec<(String, String)>,
    body: String,
    front_matter: bool,
}

impl SkillDoc {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            keys: vec![
                ("name".into(), name.into()),
                ("description".into(), description.into()),
            ],
            body: format!("# {}\n\nUsage notes.\n", name),
            front_matter: true,
        }
    }

    /// A document without front-matter.
    pub fn plain(body: &str) -> Self {
        Self {
            keys: Vec::new(),
            body: body.into(),
            front_matter: false,
        }
    }

    /// Adds a raw YAML line, e.g. `("version", "\"1.0.0\"")`.
    pub fn key(mut self, key: &str, value: &str) -> Self {
        self.keys.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.into();
        self
    }

    pub fn render(&self) -> String {
        if !self.front_matter {
            return self.body.clone();
        }
        let mut out = String::from("---\n");
        for (key, value) in &self.keys {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        out.push_str("---\n");
        out.push_str(&self.body);
        out
    }
}

/// Joins documents into one bundle using the default separator.
pub fn bundle(docs: &[SkillDoc]) -> String {
    docs.iter()
        .map(SkillDoc::render)
        .collect::<Vec<_>>()
        .join(&format!("\n{}\n", SEPARATOR))
}

/// Like [`bundle`], with a blank line on each side of every separator.
pub fn spaced_bundle(docs: &[SkillDoc]) -> String {
    docs.iter()
        .map(SkillDoc::render)
        .collect::<Vec<_>>()
        .join(&format!("\n\n{}\n\n", SEPARATOR))
}

pub struct SkillTree {
    pub root: TempDir,
}

impl SkillTree {
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }
}

#[derive(Default)]
pub struct SkillTreeBuilder {
    files: Vec<(String, String)>,
}

impl SkillTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    pub fn skill(self, path: impl Into<String>, doc: SkillDoc) -> Self {
        let content = doc.render();
        self.file(path, content)
    }

    pub fn bundle(self, path: impl Into<String>, docs: &[SkillDoc]) -> Self {
        let content = bundle(docs);
        self.file(path, content)
    }

    pub fn spaced_bundle(self, path: impl Into<String>, docs: &[SkillDoc]) -> Self {
        let content = spaced_bundle(docs);
        self.file(path, content)
    }

    pub fn build(self) -> std::io::Result<SkillTree> {
        let root = TempDir::new()?;
        for (rel, content) in &self.files {
            let path = root.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(SkillTree { root })
    }
}
