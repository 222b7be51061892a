use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::document::{SkillDocument, value_kind};
use crate::lint::diagnostic::{Finding, RuleId};
use crate::utils::truncate_chars;

use super::Check;

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
static VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("static regex"))
}

fn version_pattern() -> &'static Regex {
    VERSION_PATTERN.get_or_init(|| {
        Regex::new(r"^v?\d+\.\d+(\.\d+)?([-+][0-9A-Za-z.-]+)?$").expect("static regex")
    })
}

/// True for null, blank strings and empty collections.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Scalars rendered as text; `version: 1.2` arrives as a number.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub struct RequiredKeysCheck {
    required: Vec<String>,
}

impl RequiredKeysCheck {
    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }
}

impl Check for RequiredKeysCheck {
    fn name(&self) -> &'static str {
        "required-keys"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::MissingRequiredKey, RuleId::EmptyRequiredKey]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };

        for key in &self.required {
            match fm.get(key) {
                None => findings.push(
                    Finding::new(
                        RuleId::MissingRequiredKey,
                        format!("required key '{}' is missing", key),
                    )
                    .at(fm.start_line),
                ),
                Some(value) if is_empty_value(value) => findings.push(
                    Finding::new(
                        RuleId::EmptyRequiredKey,
                        format!("required key '{}' is empty", key),
                    )
                    .at(fm.line_of(key)),
                ),
                Some(_) => {}
            }
        }
    }
}

pub struct NameFormatCheck;

impl Check for NameFormatCheck {
    fn name(&self) -> &'static str {
        "name-format"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::NameFormat]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };
        let Some(value) = fm.get("name") else {
            return;
        };
        if is_empty_value(value) {
            return;
        }

        match value.as_str() {
            Some(name) if name_pattern().is_match(name) => {}
            Some(name) => findings.push(
                Finding::new(
                    RuleId::NameFormat,
                    format!("name '{}' is not kebab-case", name),
                )
                .at(fm.line_of("name")),
            ),
            None => findings.push(
                Finding::new(
                    RuleId::NameFormat,
                    format!("name must be a string, found {}", value_kind(value)),
                )
                .at(fm.line_of("name")),
            ),
        }
    }
}

pub struct DescriptionLengthCheck {
    max_chars: usize,
}

impl DescriptionLengthCheck {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Check for DescriptionLengthCheck {
    fn name(&self) -> &'static str {
        "description-length"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::DescriptionLength]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };
        let Some(description) = fm.description() else {
            return;
        };

        let len = description.chars().count();
        if len > self.max_chars {
            findings.push(
                Finding::new(
                    RuleId::DescriptionLength,
                    format!(
                        "description is {} characters (max {}): \"{}\"",
                        len,
                        self.max_chars,
                        truncate_chars(description, 40)
                    ),
                )
                .at(fm.line_of("description")),
            );
        }
    }
}

pub struct VersionFormatCheck;

impl VersionFormatCheck {
    const KEYS: [&'static str; 2] = ["version", "sasmp_version"];
}

impl Check for VersionFormatCheck {
    fn name(&self) -> &'static str {
        "version-format"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::VersionFormat]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };

        for key in Self::KEYS {
            let Some(value) = fm.get(key) else {
                continue;
            };
            let ok = scalar_text(value).is_some_and(|v| version_pattern().is_match(&v));
            if !ok {
                findings.push(
                    Finding::new(
                        RuleId::VersionFormat,
                        format!("'{}' should look like 1.2.3, found {}", key, value),
                    )
                    .at(fm.line_of(key)),
                );
            }
        }
    }
}

pub struct BondedAgentCheck;

impl Check for BondedAgentCheck {
    fn name(&self) -> &'static str {
        "bonded-agent"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::BondedAgent]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };
        let Some(value) = fm.get("bonded_agent") else {
            return;
        };

        let message = match value {
            Value::String(s) if !s.trim().is_empty() => return,
            Value::String(_) => "bonded_agent is blank".to_string(),
            other => format!("bonded_agent must be a string, found {}", value_kind(other)),
        };
        findings.push(Finding::new(RuleId::BondedAgent, message).at(fm.line_of("bonded_agent")));
    }
}
