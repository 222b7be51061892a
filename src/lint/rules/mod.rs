//! Per-document checks.
//!
//! Each `Check` inspects one `SkillDocument` and may emit findings for one or
//! more rules. Checks that need a parsed front-matter return early when the
//! block is absent or invalid, so broken YAML is reported once.

mod keys;
mod metadata;
mod structure;

use crate::config::LintConfig;
use crate::document::SkillDocument;

use super::diagnostic::{Finding, RuleId};

pub use keys::{
    BondedAgentCheck, DescriptionLengthCheck, NameFormatCheck, RequiredKeysCheck,
    VersionFormatCheck,
};
pub use metadata::{LoggingFieldsCheck, ParameterSchemaCheck, RetryConfigCheck};
pub use structure::{BodyCheck, FrontMatterSyntaxCheck};

pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rules this check can emit.
    fn rules(&self) -> &'static [RuleId];

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>);
}

/// Instantiate every check with its configuration.
pub fn default_checks(config: &LintConfig) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(FrontMatterSyntaxCheck::new(
            config.frontmatter.require_frontmatter,
        )),
        Box::new(BodyCheck),
        Box::new(RequiredKeysCheck::new(
            config.frontmatter.required_keys.clone(),
        )),
        Box::new(NameFormatCheck),
        Box::new(DescriptionLengthCheck::new(
            config.frontmatter.max_description_chars,
        )),
        Box::new(VersionFormatCheck),
        Box::new(BondedAgentCheck),
        Box::new(RetryConfigCheck),
        Box::new(ParameterSchemaCheck),
        Box::new(LoggingFieldsCheck),
    ]
}
