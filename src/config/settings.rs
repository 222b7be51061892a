use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::{LintError, Result};
use crate::lint::{RuleId, Severity};
use crate::utils::write_file;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "skill-lint.toml";

/// Separator line used between logical documents in a bundle file.
pub const DEFAULT_SEPARATOR: &str = "<!-- skill-separator -->";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub discovery: DiscoveryConfig,
    pub frontmatter: FrontMatterConfig,
    pub bundle: BundleConfig,
    pub rules: RulesConfig,
}

impl LintConfig {
    pub async fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(LintError::PathNotFound(config_path.to_path_buf()));
        }
        let content = fs::read_to_string(config_path).await?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `skill-lint.toml` from `dir` when present, defaults otherwise.
    pub async fn discover(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path).await
        } else {
            debug!(dir = %dir.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Write `skill-lint.toml` into `dir`. Existing files are kept unless `force`.
    pub async fn save(&self, dir: &Path, force: bool) -> Result<PathBuf> {
        self.validate()?;
        let config_path = dir.join(CONFIG_FILE_NAME);
        write_file(&config_path, &self.to_toml()?, force).await?;
        Ok(config_path)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values, collecting every problem before failing.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        // Discovery
        if self.discovery.include.is_empty() {
            errors.push("discovery.include must not be empty".into());
        }
        for pattern in self
            .discovery
            .include
            .iter()
            .chain(self.discovery.exclude.iter())
        {
            if let Err(e) = glob::Pattern::new(pattern) {
                errors.push(format!("invalid glob pattern '{}': {}", pattern, e.msg));
            }
        }
        if self.discovery.max_depth == 0 {
            errors.push("discovery.max_depth must be greater than 0".into());
        }
        if self.discovery.read_concurrency == 0 {
            errors.push("discovery.read_concurrency must be greater than 0".into());
        }

        // Front-matter
        if self
            .frontmatter
            .required_keys
            .iter()
            .any(|k| k.trim().is_empty())
        {
            errors.push("frontmatter.required_keys must not contain blank keys".into());
        }
        if self.frontmatter.max_description_chars == 0 {
            errors.push("frontmatter.max_description_chars must be greater than 0".into());
        }

        // Bundle
        if self.bundle.separator != self.bundle.separator.trim() {
            errors.push("bundle.separator must not have leading or trailing whitespace".into());
        }
        if self.bundle.separator.contains('\n') {
            errors.push("bundle.separator must be a single line".into());
        }
        if matches!(self.bundle.separator.as_str(), "---" | "...") {
            errors.push("bundle.separator must differ from front-matter delimiters".into());
        }

        // Rules
        for code in self
            .rules
            .disabled
            .iter()
            .chain(self.rules.severity.keys())
        {
            if RuleId::from_code(code).is_none() {
                errors.push(format!("unknown rule '{}'", code));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LintError::Config(errors.join("; ")))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Glob patterns (relative to each walked directory) a file must match.
    pub include: Vec<String>,
    /// Glob patterns excluding files or whole directories.
    pub exclude: Vec<String>,
    pub max_depth: usize,
    pub follow_links: bool,
    /// Skip files ignored by the walked root's `.gitignore`.
    pub respect_gitignore: bool,
    /// Maximum number of files read concurrently.
    pub read_concurrency: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.md".into(), "**/*.markdown".into()],
            exclude: vec!["**/node_modules/**".into(), "**/target/**".into()],
            max_depth: 32,
            follow_links: false,
            respect_gitignore: true,
            read_concurrency: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatterConfig {
    /// Keys that must be present and non-empty whenever a block exists.
    pub required_keys: Vec<String>,
    /// Report documents without any front-matter block.
    pub require_frontmatter: bool,
    pub max_description_chars: usize,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        Self {
            required_keys: vec!["name".into(), "description".into()],
            require_frontmatter: false,
            max_description_chars: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Literal token occupying a whole line between documents. Empty disables splitting.
    pub separator: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule codes that never run.
    pub disabled: Vec<String>,
    /// Per-rule severity overrides keyed by rule code.
    pub severity: BTreeMap<String, Severity>,
}

impl RulesConfig {
    pub fn is_disabled(&self, rule: RuleId) -> bool {
        self.disabled.iter().any(|c| c == rule.code())
    }

    pub fn severity_for(&self, rule: RuleId) -> Severity {
        self.severity
            .get(rule.code())
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }
}
