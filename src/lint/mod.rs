//! Structural lint rules for skill documents.
//!
//! - `RuleId`, `Severity`, `Diagnostic`: rule catalogue and findings
//! - `Linter`: runs enabled checks over a `Corpus`
//! - `LintReport`: diagnostics plus totals

mod diagnostic;
mod engine;
pub mod rules;

pub use diagnostic::{Diagnostic, Finding, RuleId, Severity};
pub use engine::{LintReport, Linter};
