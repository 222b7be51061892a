use crate::document::{FrontMatterError, FrontMatterState, SkillDocument};
use crate::lint::diagnostic::{Finding, RuleId};

use super::Check;

/// Front-matter delimiters and YAML well-formedness.
pub struct FrontMatterSyntaxCheck {
    require_frontmatter: bool,
}

impl FrontMatterSyntaxCheck {
    pub fn new(require_frontmatter: bool) -> Self {
        Self {
            require_frontmatter,
        }
    }
}

impl Check for FrontMatterSyntaxCheck {
    fn name(&self) -> &'static str {
        "frontmatter-syntax"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[
            RuleId::UnterminatedFrontmatter,
            RuleId::YamlSyntax,
            RuleId::FrontmatterNotMapping,
            RuleId::MissingFrontmatter,
        ]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        if doc.blank_segment {
            return;
        }

        match &doc.front_matter {
            FrontMatterState::Parsed(_) => {}
            FrontMatterState::Absent => {
                if self.require_frontmatter {
                    findings.push(
                        Finding::new(RuleId::MissingFrontmatter, "document has no front-matter")
                            .at(doc.start_line),
                    );
                }
            }
            FrontMatterState::Invalid { start_line, reason } => {
                let rule = match reason {
                    FrontMatterError::Unterminated => RuleId::UnterminatedFrontmatter,
                    FrontMatterError::Yaml(_) => RuleId::YamlSyntax,
                    FrontMatterError::NotMapping(_) => RuleId::FrontmatterNotMapping,
                };
                findings.push(Finding::new(rule, reason.to_string()).at(*start_line));
            }
        }
    }
}

/// Empty documents: blank bundle segments and bodies with nothing after the front-matter.
pub struct BodyCheck;

impl Check for BodyCheck {
    fn name(&self) -> &'static str {
        "body"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::EmptyBody, RuleId::EmptySegment]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        if doc.blank_segment {
            findings.push(
                Finding::new(
                    RuleId::EmptySegment,
                    format!(
                        "document {} of {} is blank (consecutive separators?)",
                        doc.index, doc.segment_count
                    ),
                )
                .at(doc.start_line),
            );
            return;
        }

        if doc.is_body_empty() {
            let message = if doc.front_matter.is_absent() {
                "document is empty".to_string()
            } else {
                "document has front-matter but no content".to_string()
            };
            findings.push(Finding::new(RuleId::EmptyBody, message).at(doc.body_start_line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{rules, run};
    use super::*;
    use crate::document::parse_source;
    use std::path::Path;

    #[test]
    fn test_valid_document_has_no_findings() {
        let check = FrontMatterSyntaxCheck::new(true);
        assert!(run(&check, "---\nname: a\n---\nBody").is_empty());
        assert!(run(&BodyCheck, "---\nname: a\n---\nBody").is_empty());
    }

    #[test]
    fn test_missing_front_matter_only_when_required() {
        assert!(run(&FrontMatterSyntaxCheck::new(false), "# Body").is_empty());

        let findings = run(&FrontMatterSyntaxCheck::new(true), "# Body");
        assert_eq!(rules(&findings), vec![RuleId::MissingFrontmatter]);
    }

    #[test]
    fn test_syntax_errors_map_to_rules() {
        let check = FrontMatterSyntaxCheck::new(false);

        let findings = run(&check, "---\nname: a\n# Body");
        assert_eq!(rules(&findings), vec![RuleId::UnterminatedFrontmatter]);
        assert_eq!(findings[0].line, Some(1));

        let findings = run(&check, "---\nname: {oops\n---\nBody");
        assert_eq!(rules(&findings), vec![RuleId::YamlSyntax]);

        let findings = run(&check, "---\njust a string\n---\nBody");
        assert_eq!(rules(&findings), vec![RuleId::FrontmatterNotMapping]);
        assert!(findings[0].message.contains("string"));
    }

    #[test]
    fn test_empty_body() {
        let findings = run(&BodyCheck, "---\nname: a\n---\n\n  \n");
        assert_eq!(rules(&findings), vec![RuleId::EmptyBody]);
        assert_eq!(findings[0].line, Some(4));

        let findings = run(&BodyCheck, "");
        assert_eq!(rules(&findings), vec![RuleId::EmptyBody]);
        assert_eq!(findings[0].message, "document is empty");
    }

    #[test]
    fn test_unterminated_block_is_not_an_empty_body() {
        assert!(run(&BodyCheck, "---\nname: a\n").is_empty());
    }

    #[test]
    fn test_blank_segment() {
        let sep = "<!-- skill-separator -->";
        let content = format!("# A\n{sep}\n\n{sep}\n# C\n");
        let docs = parse_source(Path::new("b.md"), &content, sep);

        let mut findings = Vec::new();
        BodyCheck.check(&docs[1], &mut findings);
        FrontMatterSyntaxCheck::new(true).check(&docs[1], &mut findings);

        assert_eq!(rules(&findings), vec![RuleId::EmptySegment]);
        assert_eq!(findings[0].line, Some(3));
    }
}
