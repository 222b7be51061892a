use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Diagnostic severity. Ordered so that `Error` is the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Every rule the linter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    IoError,
    UnterminatedFrontmatter,
    YamlSyntax,
    FrontmatterNotMapping,
    MissingRequiredKey,
    EmptyRequiredKey,
    EmptyBody,
    EmptySegment,
    MissingFrontmatter,
    NameFormat,
    DescriptionLength,
    VersionFormat,
    BondedAgent,
    RetryConfig,
    ParameterSchema,
    LoggingFields,
    DuplicateName,
}

impl RuleId {
    pub const ALL: [RuleId; 17] = [
        Self::IoError,
        Self::UnterminatedFrontmatter,
        Self::YamlSyntax,
        Self::FrontmatterNotMapping,
        Self::MissingRequiredKey,
        Self::EmptyRequiredKey,
        Self::EmptyBody,
        Self::EmptySegment,
        Self::MissingFrontmatter,
        Self::NameFormat,
        Self::DescriptionLength,
        Self::VersionFormat,
        Self::BondedAgent,
        Self::RetryConfig,
        Self::ParameterSchema,
        Self::LoggingFields,
        Self::DuplicateName,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "io-error",
            Self::UnterminatedFrontmatter => "unterminated-frontmatter",
            Self::YamlSyntax => "yaml-syntax",
            Self::FrontmatterNotMapping => "frontmatter-not-mapping",
            Self::MissingRequiredKey => "missing-required-key",
            Self::EmptyRequiredKey => "empty-required-key",
            Self::EmptyBody => "empty-body",
            Self::EmptySegment => "empty-segment",
            Self::MissingFrontmatter => "missing-frontmatter",
            Self::NameFormat => "name-format",
            Self::DescriptionLength => "description-length",
            Self::VersionFormat => "version-format",
            Self::BondedAgent => "bonded-agent",
            Self::RetryConfig => "retry-config",
            Self::ParameterSchema => "parameter-schema",
            Self::LoggingFields => "logging-fields",
            Self::DuplicateName => "duplicate-name",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::IoError
            | Self::UnterminatedFrontmatter
            | Self::YamlSyntax
            | Self::FrontmatterNotMapping
            | Self::MissingRequiredKey
            | Self::EmptyRequiredKey
            | Self::EmptyBody
            | Self::EmptySegment
            | Self::RetryConfig
            | Self::ParameterSchema => Severity::Error,
            Self::MissingFrontmatter
            | Self::NameFormat
            | Self::DescriptionLength
            | Self::VersionFormat
            | Self::BondedAgent
            | Self::LoggingFields
            | Self::DuplicateName => Severity::Warning,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::IoError => "File could not be read or is not valid UTF-8",
            Self::UnterminatedFrontmatter => "Front-matter opened with '---' is never closed",
            Self::YamlSyntax => "Front-matter is not valid YAML",
            Self::FrontmatterNotMapping => "Front-matter must be a key/value mapping",
            Self::MissingRequiredKey => "A required front-matter key is absent",
            Self::EmptyRequiredKey => "A required front-matter key has no value",
            Self::EmptyBody => "Document has no content after its front-matter",
            Self::EmptySegment => "Bundle contains a blank document between separators",
            Self::MissingFrontmatter => "Document has no front-matter block",
            Self::NameFormat => "'name' should be kebab-case",
            Self::DescriptionLength => "'description' exceeds the configured length",
            Self::VersionFormat => "'version' and 'sasmp_version' should be MAJOR.MINOR[.PATCH]",
            Self::BondedAgent => "'bonded_agent' must be a non-empty string",
            Self::RetryConfig => "'retry_config' must hold sane attempt counts and delays",
            Self::ParameterSchema => "'parameter_validation.schema' must be a well-formed schema",
            Self::LoggingFields => "'logging.fields' must list unique field names",
            Self::DuplicateName => "Two documents share the same 'name'",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A rule finding before it is attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub rule: RuleId,
    pub line: Option<usize>,
    pub message: String,
}

impl Finding {
    pub fn new(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            line: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub severity: Severity,
    pub path: PathBuf,
    /// 1-based document position when the file is a bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn location(&self) -> String {
        let mut loc = self.path.display().to_string();
        if let Some(doc) = self.document {
            loc.push_str(&format!("#{}", doc));
        }
        if let Some(line) = self.line {
            loc.push_str(&format!(":{}", line));
        }
        loc
    }

    pub(crate) fn sort_key(&self) -> (&PathBuf, usize, usize, RuleId) {
        (
            &self.path,
            self.document.unwrap_or(0),
            self.line.unwrap_or(0),
            self.rule,
        )
    }
}
