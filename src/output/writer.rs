use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::{Display, OutputFormat};
use crate::config::LintConfig;
use crate::corpus::CorpusFile;
use crate::document::{FrontMatterState, SkillDocument, SplitEntry};
use crate::error::Result;
use crate::lint::{Diagnostic, LintReport, RuleId, Severity};

/// Output writer that handles different output formats.
///
/// Supports three output modes:
/// - Text: Human-readable formatted output (default)
/// - Json: Single JSON value per command
/// - Stream: NDJSON streaming (one JSON object per line)
pub struct OutputWriter {
    format: OutputFormat,
    display: Display,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            display: Display::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.format == OutputFormat::Text
    }

    /// Emit a lint report.
    pub fn emit_report(&self, report: &LintReport) {
        match self.format {
            OutputFormat::Text => self.display.print_report(report),
            OutputFormat::Json => self.write_json(&ReportOutput::from(report)),
            OutputFormat::Stream => {
                for diagnostic in &report.diagnostics {
                    self.write_json(&StreamEvent::Diagnostic(diagnostic));
                }
                self.write_json(&StreamEvent::Summary(ReportSummary::from(report)));
            }
        }
    }

    /// Emit the document inventory.
    pub fn emit_inventory(&self, entries: &[InventoryEntry]) {
        match self.format {
            OutputFormat::Text => self.display.print_inventory(entries),
            OutputFormat::Json => self.write_json(&entries),
            OutputFormat::Stream => {
                for entry in entries {
                    self.write_json(&StreamEvent::Document(entry));
                }
            }
        }
    }

    /// Emit the segments of a split bundle. `out_dir` is set when files were written.
    pub fn emit_split(&self, source: &Path, entries: &[SplitEntry], out_dir: Option<&Path>) {
        match self.format {
            OutputFormat::Text => self.display.print_split(source, entries, out_dir),
            OutputFormat::Json => self.write_json(&SplitOutput {
                source: source.to_path_buf(),
                out_dir: out_dir.map(Path::to_path_buf),
                segments: entries,
            }),
            OutputFormat::Stream => {
                for entry in entries {
                    self.write_json(&StreamEvent::Segment(entry));
                }
            }
        }
    }

    /// Emit the rule catalogue with effective settings.
    pub fn emit_rules(&self, rules: &[RuleInfo]) {
        match self.format {
            OutputFormat::Text => self.display.print_rules(rules),
            OutputFormat::Json => self.write_json(&rules),
            OutputFormat::Stream => {
                for rule in rules {
                    self.write_json(&StreamEvent::Rule(rule));
                }
            }
        }
    }

    /// Emit the effective configuration: TOML for text, JSON otherwise.
    pub fn emit_config(&self, config: &LintConfig) -> Result<()> {
        match self.format {
            OutputFormat::Text => print!("{}", config.to_toml()?),
            OutputFormat::Json | OutputFormat::Stream => self.write_json(config),
        }
        Ok(())
    }

    /// Emit a simple message.
    pub fn emit_message(&self, message: &str) {
        match self.format {
            OutputFormat::Text => {
                println!("{}", message);
            }
            OutputFormat::Json | OutputFormat::Stream => {
                let msg = MessageOutput {
                    message: message.to_string(),
                };
                self.write_json(&msg);
            }
        }
    }

    fn write_json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string(value) {
            let mut stdout = io::stdout().lock();
            let _ = writeln!(stdout, "{}", json);
            let _ = stdout.flush();
        }
    }
}

/// One row of the `list` inventory.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryEntry {
    pub label: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<usize>,
    pub front_matter: &'static str,
    pub name: Option<String>,
    pub description: Option<String>,
    pub bonded_agent: Option<String>,
    pub keys: Vec<String>,
    /// Why the file could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InventoryEntry {
    /// One entry per document, or a single `unreadable` entry.
    pub fn for_file(file: &CorpusFile) -> Vec<Self> {
        match file {
            CorpusFile::Parsed { documents, .. } => documents.iter().map(Self::from).collect(),
            CorpusFile::Unreadable { path, reason } => vec![Self {
                label: path.display().to_string(),
                path: path.clone(),
                document: None,
                front_matter: "unreadable",
                name: None,
                description: None,
                bonded_agent: None,
                keys: Vec::new(),
                error: Some(reason.clone()),
            }],
        }
    }

    pub fn is_unreadable(&self) -> bool {
        self.error.is_some()
    }
}

impl From<&SkillDocument> for InventoryEntry {
    fn from(doc: &SkillDocument) -> Self {
        let fm = doc.front_matter();
        Self {
            label: doc.label(),
            path: doc.path.clone(),
            document: doc.bundle_index(),
            front_matter: match doc.front_matter {
                FrontMatterState::Absent => "absent",
                FrontMatterState::Parsed(_) => "parsed",
                FrontMatterState::Invalid { .. } => "invalid",
            },
            name: fm.and_then(|f| f.name()).map(str::to_string),
            description: fm.and_then(|f| f.description()).map(str::to_string),
            bonded_agent: fm.and_then(|f| f.bonded_agent()).map(str::to_string),
            keys: fm
                .map(|f| f.keys().map(str::to_string).collect())
                .unwrap_or_default(),
            error: None,
        }
    }
}

/// Rule catalogue row with the configuration applied.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub code: &'static str,
    pub severity: Severity,
    pub default_severity: Severity,
    pub enabled: bool,
    pub description: &'static str,
}

impl RuleInfo {
    pub fn new(rule: RuleId, severity: Severity, enabled: bool) -> Self {
        Self {
            code: rule.code(),
            severity,
            default_severity: rule.default_severity(),
            enabled,
            description: rule.description(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub files: usize,
    pub documents: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl From<&LintReport> for ReportSummary {
    fn from(report: &LintReport) -> Self {
        Self {
            files: report.files,
            documents: report.documents,
            errors: report.error_count(),
            warnings: report.warning_count(),
            infos: report.count(Severity::Info),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ReportOutput<'a> {
    summary: ReportSummary,
    diagnostics: &'a [Diagnostic],
}

impl<'a> From<&'a LintReport> for ReportOutput<'a> {
    fn from(report: &'a LintReport) -> Self {
        Self {
            summary: ReportSummary::from(report),
            diagnostics: &report.diagnostics,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SplitOutput<'a> {
    source: PathBuf,
    out_dir: Option<PathBuf>,
    segments: &'a [SplitEntry],
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent<'a> {
    Diagnostic(&'a Diagnostic),
    Summary(ReportSummary),
    Document(&'a InventoryEntry),
    Segment(&'a SplitEntry),
    Rule(&'a RuleInfo),
}

#[derive(Debug, Clone, Serialize)]
struct MessageOutput {
    message: String,
}
