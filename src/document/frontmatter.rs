//! YAML front-matter extraction.
//!
//! A block opens with `---` on the first line of a document and closes at the
//! next `---` or `...` line. Everything after the closing line is body.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use tracing::trace;

use super::types::{FrontMatter, FrontMatterError, FrontMatterState};

const OPEN_DELIMITER: &str = "---";
const CLOSE_DELIMITERS: [&str; 2] = ["---", "..."];
const BOM: char = '\u{feff}';

/// Result of splitting a document into front-matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFrontMatter<'a> {
    pub state: FrontMatterState,
    pub body: &'a str,
    /// Lines consumed before the body starts.
    pub body_line_offset: usize,
}

/// Split `text` into front-matter and body. `start_line` is the 1-based source
/// line of the first line of `text`.
pub fn parse_front_matter(text: &str, start_line: usize) -> ParsedFrontMatter<'_> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next().filter(|l| strip_eol(l) == OPEN_DELIMITER) else {
        return ParsedFrontMatter {
            state: FrontMatterState::Absent,
            body: text,
            body_line_offset: 0,
        };
    };

    let yaml_start = first.len();
    let mut consumed = yaml_start;

    for (idx, line) in lines.enumerate() {
        if CLOSE_DELIMITERS.contains(&strip_eol(line)) {
            let raw = &text[yaml_start..consumed];
            let body = &text[consumed + line.len()..];
            let state = match parse_yaml(raw) {
                Ok(values) => FrontMatterState::Parsed(FrontMatter::new(raw, start_line, values)),
                Err(reason) => FrontMatterState::Invalid { start_line, reason },
            };
            return ParsedFrontMatter {
                state,
                body,
                // opening line + yaml lines + closing line
                body_line_offset: idx + 2,
            };
        }
        consumed += line.len();
    }

    trace!(start_line, "Front-matter block is not terminated");
    ParsedFrontMatter {
        state: FrontMatterState::Invalid {
            start_line,
            reason: FrontMatterError::Unterminated,
        },
        body: text,
        body_line_offset: 0,
    }
}

fn parse_yaml(raw: &str) -> Result<Map<String, Value>, FrontMatterError> {
    let blank = raw.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('#')
    });
    if blank {
        return Ok(Map::new());
    }

    match serde_yaml_bw::from_str::<StrictValue>(raw).map(|v| v.0) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(FrontMatterError::NotMapping(value_kind(&other).to_string())),
        Err(e) => Err(FrontMatterError::Yaml(e.to_string())),
    }
}

/// A YAML value whose mapping keys must be strings. `1: x` or `true: y`
/// are rejected instead of being coerced to `"1"` and `"true"`.
struct StrictValue(Value);

impl<'de> Deserialize<'de> for StrictValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StrictValueVisitor).map(StrictValue)
    }
}

struct StrictValueVisitor;

impl<'de> Visitor<'de> for StrictValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a YAML value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        StrictValue::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(StrictValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Map::new();
        while let Some((StrictKey(key), StrictValue(value))) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }
}

struct StrictKey(String);

impl<'de> Deserialize<'de> for StrictKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StrictKeyVisitor).map(StrictKey)
    }
}

struct StrictKeyVisitor;

impl Visitor<'_> for StrictKeyVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
