//! Planning the split of a bundle into standalone files.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use super::bundle::split_bundle;
use super::{leading_blank_lines, parse_document};
use crate::utils::to_kebab_case;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitEntry {
    pub index: usize,
    pub start_line: usize,
    /// Front-matter `name`, when the segment has one.
    pub name: Option<String>,
    /// Target file name for the segment.
    pub file_name: String,
    /// Blank segments are listed but never written.
    pub blank: bool,
    #[serde(skip)]
    pub content: String,
}

/// Work out one output file per segment of `content`.
///
/// Files are named after the segment's kebab-cased `name`, falling back to
/// `<stem>-<index>.md`. A taken name gets the segment index appended, counting
/// upwards until the name is free. Bundle members lose the blank lines that
/// preceded their front-matter so the written file opens with `---`.
pub fn plan_split(source: &Path, content: &str, separator: &str) -> Vec<SplitEntry> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .map(to_kebab_case)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string());

    let bundle = split_bundle(content, separator);
    let count = bundle.len();
    let mut used = HashSet::new();
    bundle
        .segments
        .into_iter()
        .map(|segment| {
            let name = parse_document(source, &segment, count)
                .name()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());

            let base = name
                .as_deref()
                .map(to_kebab_case)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("{}-{}", stem, segment.index));
            let mut file_name = format!("{}.md", base);
            let mut suffix = segment.index;
            while used.contains(&file_name) {
                file_name = format!("{}-{}.md", base, suffix);
                suffix += 1;
            }
            used.insert(file_name.clone());

            let blank = segment.is_blank();
            let mut content = segment.text;
            if count > 1 && !blank {
                content.drain(..leading_blank_lines(&content).0);
            }

            SplitEntry {
                index: segment.index,
                start_line: segment.start_line,
                name,
                file_name,
                blank,
                content,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "<!-- skill-separator -->";

    #[test]
    fn test_plan_uses_front_matter_names() {
        let content = format!(
            "---\nname: API Design\n---\nA\n{SEP}\n# untitled\n{SEP}\n---\nname: api-design\n---\nC\n"
        );
        let plan = plan_split(Path::new("skills/All Skills.md"), &content, SEP);

        let names: Vec<_> = plan.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["api-design.md", "all-skills-2.md", "api-design-3.md"]
        );
        assert_eq!(plan[0].name.as_deref(), Some("API Design"));
        assert_eq!(plan[1].name, None);
        assert_eq!(plan[2].start_line, 8);
    }

    #[test]
    fn test_plan_marks_blank_segments() {
        let content = format!("# A\n{SEP}\n\n{SEP}\n# C\n");
        let plan = plan_split(Path::new("b.md"), &content, SEP);

        assert_eq!(plan.len(), 3);
        assert!(plan[1].blank);
        assert_eq!(plan[1].file_name, "b-2.md");
    }

    #[test]
    fn test_plan_names_never_repeat() {
        let content = format!(
            "---\nname: x-3\n---\nA\n{SEP}\n---\nname: x\n---\nB\n{SEP}\n---\nname: x\n---\nC\n"
        );
        let plan = plan_split(Path::new("b.md"), &content, SEP);

        let names: Vec<_> = plan.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["x-3.md", "x.md", "x-4.md"]);
    }

    #[test]
    fn test_plan_strips_blank_lines_before_front_matter() {
        let content = format!("# A\n\n{SEP}\n\n\n---\nname: b\n---\nbeta\n");
        let plan = plan_split(Path::new("bundle.md"), &content, SEP);

        assert_eq!(plan[1].content, "---\nname: b\n---\nbeta\n");
        let standalone = crate::document::parse_source(Path::new("b.md"), &plan[1].content, SEP);
        assert_eq!(standalone.len(), 1);
        assert_eq!(standalone[0].name(), Some("b"));
    }

    #[test]
    fn test_plan_single_document() {
        let plan = plan_split(Path::new("solo.md"), "# Solo\n", SEP);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].file_name, "solo-1.md");
        assert_eq!(plan[0].content, "# Solo\n");
    }
}
