use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{LintConfig, RulesConfig};
use crate::corpus::{Corpus, CorpusFile};
use crate::document::SkillDocument;

use super::diagnostic::{Diagnostic, Finding, RuleId, Severity};
use super::rules::{Check, default_checks};

/// Runs the enabled checks over documents and corpora.
pub struct Linter {
    checks: Vec<Box<dyn Check>>,
    rules: RulesConfig,
}

impl Linter {
    pub fn new(config: &LintConfig) -> Self {
        let rules = config.rules.clone();
        let checks: Vec<Box<dyn Check>> = default_checks(config)
            .into_iter()
            .filter(|check| {
                let active = check.rules().iter().any(|r| !rules.is_disabled(*r));
                if !active {
                    debug!(check = check.name(), "All rules disabled, skipping check");
                }
                active
            })
            .collect();

        Self { checks, rules }
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.rules.is_disabled(rule)
    }

    pub fn severity(&self, rule: RuleId) -> Severity {
        self.rules.severity_for(rule)
    }

    fn diagnostic(&self, path: &Path, document: Option<usize>, finding: Finding) -> Diagnostic {
        Diagnostic {
            rule: finding.rule,
            severity: self.severity(finding.rule),
            path: path.to_path_buf(),
            document,
            line: finding.line,
            message: finding.message,
        }
    }

    pub fn lint_document(&self, doc: &SkillDocument) -> Vec<Diagnostic> {
        let mut findings = Vec::new();
        for check in &self.checks {
            check.check(doc, &mut findings);
        }

        findings
            .into_iter()
            .filter(|f| self.is_enabled(f.rule))
            .map(|f| self.diagnostic(doc.path(), doc.bundle_index(), f))
            .collect()
    }

    /// Lint every document, then apply corpus-wide rules.
    pub fn lint_corpus(&self, corpus: &Corpus) -> LintReport {
        let mut diagnostics = Vec::new();

        for file in corpus.files() {
            match file {
                CorpusFile::Parsed { documents, .. } => {
                    for doc in documents {
                        diagnostics.extend(self.lint_document(doc));
                    }
                }
                CorpusFile::Unreadable { path, reason } => {
                    if self.is_enabled(RuleId::IoError) {
                        let finding = Finding::new(RuleId::IoError, reason.clone());
                        diagnostics.push(self.diagnostic(path, None, finding));
                    }
                }
            }
        }

        if self.is_enabled(RuleId::DuplicateName) {
            diagnostics.extend(self.duplicate_names(corpus));
        }

        diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let report = LintReport {
            files: corpus.file_count(),
            documents: corpus.document_count(),
            diagnostics,
        };
        info!(
            files = report.files,
            documents = report.documents,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Lint complete"
        );
        report
    }

    /// Every document after the first that reuses a `name`.
    fn duplicate_names(&self, corpus: &Corpus) -> Vec<Diagnostic> {
        let mut first_seen: HashMap<&str, &SkillDocument> = HashMap::new();
        let mut diagnostics = Vec::new();

        for doc in corpus.documents() {
            let Some(name) = doc.name().map(str::trim).filter(|n| !n.is_empty()) else {
                continue;
            };
            match first_seen.get(name) {
                None => {
                    first_seen.insert(name, doc);
                }
                Some(original) => {
                    let line = doc
                        .front_matter()
                        .map(|fm| fm.line_of("name"))
                        .unwrap_or(doc.start_line);
                    let finding = Finding::new(
                        RuleId::DuplicateName,
                        format!("name '{}' is already used by {}", name, original.label()),
                    )
                    .at(line);
                    diagnostics.push(self.diagnostic(doc.path(), doc.bundle_index(), finding));
                }
            }
        }

        diagnostics
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LintReport {
    pub files: usize,
    pub documents: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl LintReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.diagnostics.iter().map(|d| d.severity).max()
    }

    /// No errors, and no warnings either when `deny_warnings` is set.
    pub fn is_clean(&self, deny_warnings: bool) -> bool {
        match self.max_severity() {
            None | Some(Severity::Info) => true,
            Some(Severity::Warning) => !deny_warnings,
            Some(Severity::Error) => false,
        }
    }
}
