//! Skill document model and parsing.
//!
//! - `split_bundle`: carve a concatenated file into segments
//! - `parse_front_matter`: separate YAML front-matter from Markdown body
//! - `SkillDocument`: one parsed logical document
//! - `plan_split`: name the standalone files a bundle splits into

mod bundle;
mod export;
mod frontmatter;
mod types;

use std::path::Path;

pub use bundle::{Bundle, Segment, split_bundle};
pub use export::{SplitEntry, plan_split};
pub use frontmatter::{ParsedFrontMatter, parse_front_matter};
pub(crate) use frontmatter::value_kind;
pub use types::{FrontMatter, FrontMatterError, FrontMatterState, SkillDocument};

/// Parse one bundle segment into a document.
///
/// Bundle members may have blank lines between the separator and their
/// front-matter; standalone files must open with the delimiter.
pub fn parse_document(path: &Path, segment: &Segment, segment_count: usize) -> SkillDocument {
    let bundled = segment_count > 1;
    let (skip_bytes, skip_lines) = if bundled {
        leading_blank_lines(&segment.text)
    } else {
        (0, 0)
    };
    let first_line = segment.start_line + skip_lines;
    let parsed = parse_front_matter(&segment.text[skip_bytes..], first_line);

    SkillDocument {
        path: path.to_path_buf(),
        index: segment.index,
        segment_count,
        start_line: segment.start_line,
        front_matter: parsed.state,
        body: parsed.body.to_string(),
        body_start_line: first_line + parsed.body_line_offset,
        blank_segment: bundled && segment.is_blank(),
    }
}

/// Byte length and line count of the whitespace-only lines opening `text`.
fn leading_blank_lines(text: &str) -> (usize, usize) {
    text.split_inclusive('\n')
        .take_while(|line| line.trim().is_empty())
        .fold((0, 0), |(bytes, lines), line| (bytes + line.len(), lines + 1))
}

/// Split a source file on `separator` and parse every segment.
pub fn parse_source(path: &Path, content: &str, separator: &str) -> Vec<SkillDocument> {
    let bundle = split_bundle(content, separator);
    let count = bundle.len();
    bundle
        .segments
        .iter()
        .map(|segment| parse_document(path, segment, count))
        .collect()
}
