//! Checks for structured metadata blocks: retry hints, parameter schemas and
//! logging field lists. These are descriptive only; nothing here applies them.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::document::{FrontMatter, SkillDocument, value_kind};
use crate::lint::diagnostic::{Finding, RuleId};

use super::Check;

pub struct RetryConfigCheck;

impl RetryConfigCheck {
    const KEY: &'static str = "retry_config";
    /// Counts that must be at least 1.
    const ATTEMPT_KEYS: [&'static str; 1] = ["max_attempts"];
    /// Counts that may be 0.
    const RETRY_KEYS: [&'static str; 2] = ["max_retries", "retries"];
    const DELAY_KEYS: [&'static str; 8] = [
        "initial_delay_ms",
        "max_delay_ms",
        "backoff_ms",
        "max_backoff_ms",
        "initial_delay",
        "max_delay",
        "timeout_ms",
        "jitter_ms",
    ];
    const MULTIPLIER_KEYS: [&'static str; 2] = ["multiplier", "backoff_multiplier"];
    const STRATEGIES: [&'static str; 4] = ["exponential", "linear", "fixed", "constant"];
    /// (lower, upper) delay pairs that must be ordered.
    const ORDERED: [(&'static str, &'static str); 3] = [
        ("initial_delay_ms", "max_delay_ms"),
        ("backoff_ms", "max_backoff_ms"),
        ("initial_delay", "max_delay"),
    ];

    fn check_block(block: &Map<String, Value>) -> Vec<String> {
        let mut problems = Vec::new();

        for key in Self::ATTEMPT_KEYS {
            if let Some(v) = block.get(key)
                && !v.as_u64().is_some_and(|n| n >= 1)
            {
                problems.push(format!("{} must be a positive integer, found {}", key, v));
            }
        }
        for key in Self::RETRY_KEYS {
            if let Some(v) = block.get(key)
                && v.as_u64().is_none()
            {
                problems.push(format!("{} must be a non-negative integer, found {}", key, v));
            }
        }
        for key in Self::DELAY_KEYS {
            if let Some(v) = block.get(key)
                && !v.as_f64().is_some_and(|n| n >= 0.0)
            {
                problems.push(format!("{} must be a non-negative number, found {}", key, v));
            }
        }
        for key in Self::MULTIPLIER_KEYS {
            if let Some(v) = block.get(key)
                && !v.as_f64().is_some_and(|n| n >= 1.0)
            {
                problems.push(format!("{} must be a number >= 1, found {}", key, v));
            }
        }
        for key in ["backoff", "strategy"] {
            if let Some(Value::String(s)) = block.get(key)
                && !Self::STRATEGIES.contains(&s.to_lowercase().as_str())
            {
                problems.push(format!(
                    "{} '{}' is not one of {}",
                    key,
                    s,
                    Self::STRATEGIES.join(", ")
                ));
            }
        }
        for (lower, upper) in Self::ORDERED {
            let pair = (
                block.get(lower).and_then(Value::as_f64),
                block.get(upper).and_then(Value::as_f64),
            );
            if let (Some(lo), Some(hi)) = pair
                && lo > hi
            {
                problems.push(format!("{} ({}) exceeds {} ({})", lower, lo, upper, hi));
            }
        }

        problems
    }
}

impl Check for RetryConfigCheck {
    fn name(&self) -> &'static str {
        "retry-config"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::RetryConfig]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };
        let Some(value) = fm.get(Self::KEY) else {
            return;
        };
        let line = fm.line_of(Self::KEY);

        let Some(block) = value.as_object() else {
            findings.push(
                Finding::new(
                    RuleId::RetryConfig,
                    format!("retry_config must be a mapping, found {}", value_kind(value)),
                )
                .at(line),
            );
            return;
        };

        for problem in Self::check_block(block) {
            findings.push(
                Finding::new(RuleId::RetryConfig, format!("retry_config: {}", problem)).at(line),
            );
        }
    }
}

pub struct ParameterSchemaCheck;

impl ParameterSchemaCheck {
    const KEY: &'static str = "parameter_validation";

    fn check_schema(schema: &Map<String, Value>) -> Vec<String> {
        let mut problems = Vec::new();

        if let Some(ty) = schema.get("type")
            && !ty.is_string()
        {
            problems.push(format!("schema.type must be a string, found {}", value_kind(ty)));
        }

        let properties = match schema.get("properties") {
            None => None,
            Some(Value::Object(props)) => {
                for (name, prop) in props {
                    if !prop.is_object() {
                        problems.push(format!(
                            "schema.properties.{} must be a mapping, found {}",
                            name,
                            value_kind(prop)
                        ));
                    }
                }
                Some(props)
            }
            Some(other) => {
                problems.push(format!(
                    "schema.properties must be a mapping, found {}",
                    value_kind(other)
                ));
                None
            }
        };

        match schema.get("required") {
            None => {}
            Some(Value::Array(items)) => {
                for item in items {
                    match item.as_str() {
                        None => problems.push(format!(
                            "schema.required entries must be strings, found {}",
                            value_kind(item)
                        )),
                        Some(name) => {
                            if let Some(props) = properties
                                && !props.contains_key(name)
                            {
                                problems.push(format!(
                                    "schema.required names '{}' which is not in schema.properties",
                                    name
                                ));
                            }
                        }
                    }
                }
            }
            Some(other) => problems.push(format!(
                "schema.required must be a list, found {}",
                value_kind(other)
            )),
        }

        problems
    }

    fn problems(fm: &FrontMatter) -> Option<Vec<String>> {
        let value = fm.get(Self::KEY)?;
        let Some(block) = value.as_object() else {
            return Some(vec![format!(
                "must be a mapping, found {}",
                value_kind(value)
            )]);
        };

        match block.get("schema") {
            None => Some(Vec::new()),
            Some(Value::Object(schema)) => Some(Self::check_schema(schema)),
            Some(other) => Some(vec![format!(
                "schema must be a mapping, found {}",
                value_kind(other)
            )]),
        }
    }
}

impl Check for ParameterSchemaCheck {
    fn name(&self) -> &'static str {
        "parameter-schema"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::ParameterSchema]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };
        let Some(problems) = Self::problems(fm) else {
            return;
        };

        let line = fm.line_of(Self::KEY);
        for problem in problems {
            findings.push(
                Finding::new(
                    RuleId::ParameterSchema,
                    format!("parameter_validation: {}", problem),
                )
                .at(line),
            );
        }
    }
}

pub struct LoggingFieldsCheck;

impl Check for LoggingFieldsCheck {
    fn name(&self) -> &'static str {
        "logging-fields"
    }

    fn rules(&self) -> &'static [RuleId] {
        &[RuleId::LoggingFields]
    }

    fn check(&self, doc: &SkillDocument, findings: &mut Vec<Finding>) {
        let Some(fm) = doc.front_matter() else {
            return;
        };
        let Some(logging) = fm.get("logging") else {
            return;
        };
        let line = fm.line_of("logging");
        let mut report = |message: String| {
            findings.push(Finding::new(RuleId::LoggingFields, message).at(line));
        };

        let Some(block) = logging.as_object() else {
            report(format!(
                "logging must be a mapping, found {}",
                value_kind(logging)
            ));
            return;
        };
        let Some(fields) = block.get("fields") else {
            return;
        };
        let Some(items) = fields.as_array() else {
            report(format!(
                "logging.fields must be a list, found {}",
                value_kind(fields)
            ));
            return;
        };

        let mut seen = HashSet::new();
        for item in items {
            match item.as_str().map(str::trim) {
                Some("") => report("logging.fields contains a blank entry".to_string()),
                Some(field) => {
                    if !seen.insert(field) {
                        report(format!("logging.fields lists '{}' more than once", field));
                    }
                }
                None => report(format!(
                    "logging.fields entries must be strings, found {}",
                    value_kind(item)
                )),
            }
        }
    }
}
