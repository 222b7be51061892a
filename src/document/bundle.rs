//! Splitting of concatenated multi-document files.
//!
//! A bundle separates documents with a line holding only the separator token.
//! Separator lines inside fenced code blocks are content, not boundaries.

use serde::Serialize;

/// One logical document carved out of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// 1-based position within the source file.
    pub index: usize,
    /// 1-based source line of the segment's first line.
    pub start_line: usize,
    #[serde(skip)]
    pub text: String,
}

impl Segment {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bundle {
    pub segments: Vec<Segment>,
    /// Separator lines found outside code fences.
    pub separator_count: usize,
}

impl Bundle {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_multi(&self) -> bool {
        self.segments.len() > 1
    }

    /// Interior segments holding only whitespace.
    pub fn blank_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_blank())
    }
}

/// Tracks whether the scanner is inside a fenced code block.
#[derive(Debug, Default)]
struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    fn update(&mut self, line: &str) {
        // Four spaces of indent make an indented code line, not a fence.
        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            return;
        }
        let Some(marker) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~') else {
            return;
        };
        let run = trimmed.chars().take_while(|c| *c == marker).count();
        if run < 3 {
            return;
        }

        match self.open {
            None => self.open = Some((marker, run)),
            Some((open_marker, open_run)) => {
                let closes = marker == open_marker
                    && run >= open_run
                    && trimmed[run * marker.len_utf8()..].trim().is_empty();
                if closes {
                    self.open = None;
                }
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Where the scanner is within the current segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    /// Only blank lines so far.
    Start,
    /// Inside a `---` block; YAML is never scanned for fences.
    FrontMatter,
    Body,
}

impl Region {
    fn advance(self, line: &str, fence: &mut FenceState) -> Self {
        let text = line.trim_end_matches(['\n', '\r']);
        match self {
            Self::Start if text.trim_start().is_empty() => Self::Start,
            Self::Start if text.trim_start_matches('\u{feff}') == "---" => Self::FrontMatter,
            Self::FrontMatter if text == "---" || text == "..." => Self::Body,
            Self::FrontMatter => Self::FrontMatter,
            Self::Start | Self::Body => {
                fence.update(line);
                Self::Body
            }
        }
    }
}

/// Split `content` on lines equal to `separator` (after trimming).
///
/// Blank segments before the first and after the last non-blank segment are
/// dropped, so a file may start or end with a separator. An empty separator
/// disables splitting.
pub fn split_bundle(content: &str, separator: &str) -> Bundle {
    let separator = separator.trim();
    if separator.is_empty() {
        return Bundle {
            segments: vec![Segment {
                index: 1,
                start_line: 1,
                text: content.to_string(),
            }],
            separator_count: 0,
        };
    }

    let mut raw: Vec<(usize, String)> = Vec::new();
    let mut current = String::new();
    let mut current_start = 1;
    let mut fence = FenceState::default();
    let mut region = Region::Start;
    let mut separator_count = 0;

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        if !fence.is_open() && line.trim() == separator {
            raw.push((current_start, std::mem::take(&mut current)));
            current_start = line_no + 1;
            separator_count += 1;
            region = Region::Start;
            continue;
        }
        region = region.advance(line, &mut fence);
        current.push_str(line);
    }
    raw.push((current_start, current));

    let first = raw.iter().position(|(_, t)| !t.trim().is_empty());
    let last = raw.iter().rposition(|(_, t)| !t.trim().is_empty());
    let kept = match (first, last) {
        (Some(first), Some(last)) => &raw[first..=last],
        // Entirely blank: keep one segment so the emptiness is reported once.
        _ => &raw[..1],
    };

    let segments = kept
        .iter()
        .enumerate()
        .map(|(i, (start_line, text))| Segment {
            index: i + 1,
            start_line: *start_line,
            text: text.clone(),
        })
        .collect();

    Bundle {
        segments,
        separator_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "<!-- skill-separator -->";

    #[test]
    fn test_no_separator_is_single_segment() {
        let bundle = split_bundle("---\nname: a\n---\nBody\n", SEP);
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.separator_count, 0);
        assert_eq!(bundle.segments[0].start_line, 1);
        assert!(!bundle.is_multi());
    }

    #[test]
    fn test_splits_on_separator() {
        let content = format!("# A\nalpha\n{SEP}\n# B\nbeta\n{SEP}\n# C\n");
        let bundle = split_bundle(&content, SEP);

        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.separator_count, 2);
        assert_eq!(bundle.segments[0].text, "# A\nalpha\n");
        assert_eq!(bundle.segments[1].text, "# B\nbeta\n");
        assert_eq!(bundle.segments[1].start_line, 4);
        assert_eq!(bundle.segments[2].start_line, 7);
        assert_eq!(bundle.segments[2].index, 3);
    }

    #[test]
    fn test_separator_with_surrounding_whitespace() {
        let content = format!("# A\n   {SEP}  \r\n# B\n");
        let bundle = split_bundle(&content, SEP);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_separator_must_be_whole_line() {
        let content = format!("# A\nsee {SEP} inline\n# B\n");
        let bundle = split_bundle(&content, SEP);
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn test_separator_inside_code_fence_is_ignored() {
        let content = format!("# A\n```markdown\n{SEP}\n```\n{SEP}\n# B\n");
        let bundle = split_bundle(&content, SEP);

        assert_eq!(bundle.len(), 2);
        assert!(bundle.segments[0].text.contains(SEP));
    }

    #[test]
    fn test_fence_in_front_matter_block_scalar_is_ignored() {
        let content = format!(
            "---\nname: a\nexample: |\n  ```js\n  run();\n---\nalpha\n{SEP}\n---\nname: b\n---\nbeta\n"
        );
        let bundle = split_bundle(&content, SEP);

        assert_eq!(bundle.len(), 2);
        assert!(bundle.segments[1].text.starts_with("---\nname: b"));
    }

    #[test]
    fn test_deeply_indented_backticks_are_not_a_fence() {
        let content = format!("# A\n    ```\n    code\n{SEP}\n# B\n");
        let bundle = split_bundle(&content, SEP);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn test_front_matter_after_blank_lines_is_not_scanned() {
        let content = format!("# A\n{SEP}\n\n---\nnote: |\n ~~~\n---\nbody\n{SEP}\n# C\n");
        let bundle = split_bundle(&content, SEP);
        assert_eq!(bundle.len(), 3);
    }

    #[test]
    fn test_tilde_fence_and_longer_closing_run() {
        let content = format!("~~~~\n{SEP}\n~~~\nstill fenced\n{SEP}\n~~~~~\n{SEP}\n# B\n");
        let bundle = split_bundle(&content, SEP);
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.separator_count, 1);
    }

    #[test]
    fn test_leading_and_trailing_separators_are_dropped() {
        let content = format!("{SEP}\n# A\n{SEP}\n# B\n{SEP}\n\n");
        let bundle = split_bundle(&content, SEP);

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.segments[0].index, 1);
        assert_eq!(bundle.segments[0].start_line, 2);
        assert_eq!(bundle.blank_segments().count(), 0);
    }

    #[test]
    fn test_interior_blank_segment_is_kept() {
        let content = format!("# A\n{SEP}\n\n{SEP}\n# C\n");
        let bundle = split_bundle(&content, SEP);

        assert_eq!(bundle.len(), 3);
        let blank: Vec<_> = bundle.blank_segments().collect();
        assert_eq!(blank.len(), 1);
        assert_eq!(blank[0].index, 2);
        assert_eq!(blank[0].start_line, 3);
    }

    #[test]
    fn test_blank_file_is_single_segment() {
        let bundle = split_bundle("\n\n", SEP);
        assert_eq!(bundle.len(), 1);
        assert!(bundle.segments[0].is_blank());

        let bundle = split_bundle(&format!("{SEP}\n{SEP}\n"), SEP);
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn test_empty_separator_disables_splitting() {
        let bundle = split_bundle("a\n\nb\n", "");
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.segments[0].text, "a\n\nb\n");
    }
}
