use std::path::Path;

use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};

use crate::document::SplitEntry;
use crate::lint::{LintReport, Severity};
use crate::output::{InventoryEntry, RuleInfo};
use crate::utils::truncate_chars;

pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().cyan());
        println!("{}", style("═".repeat(60)).dim());
        println!();
    }

    pub fn print_report(&self, report: &LintReport) {
        for diagnostic in &report.diagnostics {
            let severity_style = self.severity_style(diagnostic.severity);
            println!(
                "{} {} {} {}",
                style(diagnostic.location()).bold(),
                severity_style.apply_to(format!("{:<7}", diagnostic.severity.to_string())),
                diagnostic.message,
                style(format!("[{}]", diagnostic.rule)).dim()
            );
        }

        if !report.diagnostics.is_empty() {
            println!();
        }

        let summary = format!(
            "{} file(s), {} document(s): {} error(s), {} warning(s)",
            report.files,
            report.documents,
            report.error_count(),
            report.warning_count()
        );
        match report.max_severity() {
            Some(Severity::Error) => println!("{} {}", style("✗").red().bold(), summary),
            Some(Severity::Warning) => self.print_warning(&summary),
            _ => self.print_success(&summary),
        }
    }

    pub fn print_inventory(&self, entries: &[InventoryEntry]) {
        if entries.is_empty() {
            println!("{}", style("No skill documents found.").dim());
            return;
        }

        println!(
            "{:<32} {:<24} {:<16} {}",
            style("Document").bold(),
            style("Name").bold(),
            style("Agent").bold(),
            style("Description").bold()
        );
        println!("{}", style("─".repeat(96)).dim());

        for entry in entries {
            let name = match entry.front_matter {
                "invalid" => style("(invalid)".to_string()).red(),
                "unreadable" => style("(unreadable)".to_string()).red(),
                _ => match &entry.name {
                    Some(name) => style(truncate_chars(name, 22)),
                    None => style("-".to_string()).dim(),
                },
            };
            println!(
                "{:<32} {:<24} {:<16} {}",
                truncate_chars(&entry.label, 30),
                name,
                entry.bonded_agent.as_deref().unwrap_or("-"),
                truncate_chars(entry.description.as_deref().unwrap_or(""), 40)
            );
        }

        println!();
        let unreadable = entries.iter().filter(|e| e.is_unreadable()).count();
        let documents = entries.len() - unreadable;
        if unreadable > 0 {
            println!(
                "{}",
                style(format!("{} document(s), {} unreadable file(s)", documents, unreadable)).dim()
            );
        } else {
            println!("{}", style(format!("{} document(s)", documents)).dim());
        }
    }

    pub fn print_split(&self, source: &Path, entries: &[SplitEntry], out_dir: Option<&Path>) {
        self.print_header(&format!("Split: {}", source.display()));

        for entry in entries {
            let marker = if entry.blank {
                style("skip").dim()
            } else {
                style("→").cyan()
            };
            let target = match out_dir {
                Some(dir) => dir.join(&entry.file_name).display().to_string(),
                None => entry.file_name.clone(),
            };
            println!(
                "  {} #{} (line {}) {}",
                marker, entry.index, entry.start_line, target
            );
        }

        println!();
        let written = entries.iter().filter(|e| !e.blank).count();
        match out_dir {
            Some(dir) => {
                self.print_success(&format!("Wrote {} file(s) to {}", written, dir.display()))
            }
            None => self.print_info(&format!(
                "{} segment(s) would be written; pass --out-dir to write them",
                written
            )),
        }
    }

    pub fn print_rules(&self, rules: &[RuleInfo]) {
        println!(
            "{:<26} {:<9} {:<8} {}",
            style("Rule").bold(),
            style("Severity").bold(),
            style("Enabled").bold(),
            style("Description").bold()
        );
        println!("{}", style("─".repeat(96)).dim());

        for rule in rules {
            let enabled = if rule.enabled {
                style("yes").green()
            } else {
                style("no").dim()
            };
            println!(
                "{:<26} {:<9} {:<8} {}",
                rule.code,
                self.severity_style(rule.severity)
                    .apply_to(rule.severity.to_string()),
                enabled,
                rule.description
            );
        }
    }

    pub fn print_success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), message);
    }

    pub fn print_warning(&self, message: &str) {
        println!("{} {}", style("!").yellow().bold(), message);
    }

    pub fn print_info(&self, message: &str) {
        println!("{} {}", style("→").cyan(), message);
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("static template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }

    fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Info => Style::new().cyan(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Error => Style::new().red().bold(),
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}
