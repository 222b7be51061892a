//! Skill document types.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

/// Parsed YAML front-matter block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    /// YAML source between the delimiters.
    #[serde(skip)]
    pub raw: String,
    /// 1-based line of the opening `---` in the source file.
    pub start_line: usize,
    pub values: Map<String, Value>,
}

impl FrontMatter {
    pub fn new(raw: impl Into<String>, start_line: usize, values: Map<String, Value>) -> Self {
        Self {
            raw: raw.into(),
            start_line,
            values,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn version(&self) -> Option<&str> {
        self.get_str("version")
    }

    pub fn bonded_agent(&self) -> Option<&str> {
        self.get_str("bonded_agent")
    }

    pub fn sasmp_version(&self) -> Option<&str> {
        self.get_str("sasmp_version")
    }

    /// Source line of a top-level key, falling back to the opening delimiter.
    pub fn line_of(&self, key: &str) -> usize {
        self.raw
            .lines()
            .position(|line| {
                line.strip_prefix(key)
                    .is_some_and(|rest| rest.trim_start().starts_with(':'))
            })
            .map(|idx| self.start_line + 1 + idx)
            .unwrap_or(self.start_line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FrontMatterError {
    /// Opening delimiter without a closing one.
    Unterminated,
    /// YAML syntax error message.
    Yaml(String),
    /// Parsed, but the top level is not a mapping (value kind given).
    NotMapping(String),
}

impl fmt::Display for FrontMatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unterminated => write!(f, "front-matter block is never closed"),
            Self::Yaml(msg) => write!(f, "invalid YAML: {}", msg),
            Self::NotMapping(kind) => write!(f, "front-matter is a {}, expected a mapping", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FrontMatterState {
    #[default]
    Absent,
    Parsed(FrontMatter),
    Invalid {
        start_line: usize,
        reason: FrontMatterError,
    },
}

impl FrontMatterState {
    pub fn parsed(&self) -> Option<&FrontMatter> {
        match self {
            Self::Parsed(fm) => Some(fm),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// One logical skill document: a whole file, or one segment of a bundle.
#[derive(Debug, Clone, Serialize)]
pub struct SkillDocument {
    pub path: PathBuf,
    /// 1-based position within the source file.
    pub index: usize,
    /// Number of documents the source file was split into.
    pub segment_count: usize,
    /// 1-based source line where this document starts.
    pub start_line: usize,
    pub front_matter: FrontMatterState,
    #[serde(skip)]
    pub body: String,
    pub body_start_line: usize,
    /// Interior bundle segment holding nothing but whitespace.
    pub blank_segment: bool,
}

impl SkillDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_bundled(&self) -> bool {
        self.segment_count > 1
    }

    /// Position within a bundle, `None` for single-document files.
    pub fn bundle_index(&self) -> Option<usize> {
        self.is_bundled().then_some(self.index)
    }

    pub fn front_matter(&self) -> Option<&FrontMatter> {
        self.front_matter.parsed()
    }

    pub fn name(&self) -> Option<&str> {
        self.front_matter().and_then(FrontMatter::name)
    }

    pub fn is_body_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// `path` for standalone files, `path#n` for bundle members.
    pub fn label(&self) -> String {
        if self.is_bundled() {
            format!("{}#{}", self.path.display(), self.index)
        } else {
            self.path.display().to_string()
        }
    }
}
