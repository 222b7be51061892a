pub mod cli;
pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod lint;
pub mod output;
pub mod utils;

pub use config::LintConfig;
pub use corpus::{Corpus, CorpusFile};
pub use document::{FrontMatter, FrontMatterState, SkillDocument, parse_source, split_bundle};
pub use error::{LintError, Result};
pub use lint::{Diagnostic, LintReport, Linter, RuleId, Severity};
