use crate::block::{Block, ScannedBlock};
use crate::emphasis::strip_emphasis;
use crate::line::LineRecord;
use regex::Regex;
use std::sync::LazyLock;

const FENCE: &str = "```";
const RULE: &str = "---";

static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s+(.+)$").unwrap());
static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+(.+)$").unwrap());

/// Classifies `lines` into blocks in a single forward pass.
///
/// Rules are tried in a fixed order (blank, rule, heading, fence, table,
/// bullet, numbered, paragraph) and the first match wins. Every line is
/// consumed by exactly one rule, so the scan always terminates and never
/// fails.
pub fn scan(lines: &[LineRecord]) -> Vec<ScannedBlock> {
    let mut scanner = Scanner { lines, position: 0 };
    let mut blocks = Vec::new();

    while scanner.position < lines.len() {
        let start = scanner.position;
        if let Some(block) = scanner.step() {
            blocks.push(ScannedBlock {
                block,
                lines: start..=scanner.position - 1,
            });
        }
    }

    log::debug!(
        "scanned {} lines into {} blocks",
        lines.len(),
        blocks.len()
    );
    blocks
}

struct Scanner<'a> {
    lines: &'a [LineRecord],
    position: usize,
}

impl Scanner<'_> {
    /// Consumes at least one line and returns the block it produced, if any.
    fn step(&mut self) -> Option<Block> {
        let lines = self.lines;
        let line = &lines[self.position].text;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.position += 1;
            return None;
        }

        if trimmed == RULE {
            self.position += 1;
            return Some(Block::Rule);
        }

        if let Some((level, text)) = detect_heading(line) {
            self.position += 1;
            return Some(Block::Heading { level, text });
        }

        if trimmed.starts_with(FENCE) {
            return Some(self.consume_fence());
        }

        if trimmed.starts_with('|') {
            return self.consume_table();
        }

        let block = if let Some(text) = bullet_text(trimmed) {
            Block::ListItem {
                ordered: false,
                text: strip_emphasis(text).into_owned(),
            }
        } else if let Some(text) = numbered_text(trimmed) {
            Block::ListItem {
                ordered: true,
                text: strip_emphasis(text).into_owned(),
            }
        } else {
            Block::Paragraph {
                text: strip_emphasis(trimmed).into_owned(),
            }
        };

        self.position += 1;
        Some(block)
    }

    fn consume_fence(&mut self) -> Block {
        let opened_at = self.position;
        self.position += 1;

        let mut captured = Vec::new();
        let mut closed = false;
        while let Some(line) = self.lines.get(self.position) {
            self.position += 1;
            if line.text.trim() == FENCE {
                closed = true;
                break;
            }
            captured.push(line.text.clone());
        }

        if !closed {
            let lines = &self.lines[opened_at..self.position];
            log::warn!(
                "code fence opened on line {} is never closed; treating bytes {}..{} as code",
                opened_at + 1,
                byte_start(lines),
                byte_end(lines)
            );
        }

        Block::CodeBlock { lines: captured }
    }

    fn consume_table(&mut self) -> Option<Block> {
        let opened_at = self.position;
        let mut rows: Vec<Vec<String>> = Vec::new();

        while let Some(line) = self.lines.get(self.position) {
            let trimmed = line.text.trim();
            if !trimmed.starts_with('|') {
                break;
            }
            self.position += 1;

            if is_separator_row(trimmed) {
                continue;
            }

            let mut cells = split_cells(trimmed);
            if cells.is_empty() {
                continue;
            }
            if let Some(header) = rows.first() {
                cells.truncate(header.len());
            }
            rows.push(cells);
        }

        if rows.is_empty() {
            let lines = &self.lines[opened_at..self.position];
            log::warn!(
                "table on line {} (bytes {}..{}) has only separator rows; skipping it",
                opened_at + 1,
                byte_start(lines),
                byte_end(lines)
            );
            return None;
        }

        Some(Block::Table { rows })
    }
}

fn byte_start(lines: &[LineRecord]) -> usize {
    lines.first().map_or(0, |line| line.start)
}

fn byte_end(lines: &[LineRecord]) -> usize {
    lines.last().map_or(0, |line| line.end)
}

fn detect_heading(line: &str) -> Option<(usize, String)> {
    if !line.starts_with('#') {
        return None;
    }
    let captures = ATX_HEADING.captures(line)?;
    let level = captures.get(1)?.as_str().len();
    let text = captures.get(2)?.as_str().to_string();
    Some((level, text))
}

fn bullet_text(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
}

fn numbered_text(trimmed: &str) -> Option<&str> {
    NUMBERED_ITEM
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map(|text| text.as_str())
}

/// Alignment rows carry nothing but pipes, dashes, colons and whitespace.
fn is_separator_row(trimmed: &str) -> bool {
    trimmed
        .chars()
        .all(|ch| matches!(ch, '|' | '-' | ':') || ch.is_whitespace())
}

/// Splits on `|`, dropping the segments outside the outermost pipes.
fn split_cells(trimmed: &str) -> Vec<String> {
    let segments: Vec<&str> = trimmed.split('|').collect();
    if segments.len() < 2 {
        return Vec::new();
    }
    segments[1..segments.len() - 1]
        .iter()
        .map(|cell| strip_emphasis(cell.trim()).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::lines_from_str;
    use pretty_assertions::assert_eq;

    fn blocks(input: &str) -> Vec<Block> {
        scan(&lines_from_str(input))
            .into_iter()
            .map(|scanned| scanned.block)
            .collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn detects_headings_at_any_depth() {
        assert_eq!(detect_heading("### Title Text"), Some((3, "Title Text".into())));
        assert_eq!(detect_heading("###### deep"), Some((6, "deep".into())));
        assert_eq!(detect_heading("######## deeper"), Some((8, "deeper".into())));
    }

    #[test]
    fn rejects_malformed_headings() {
        assert_eq!(detect_heading("#"), None);
        assert_eq!(detect_heading("#NoSpace"), None);
        assert_eq!(detect_heading("  # indented"), None);
    }

    #[test]
    fn heading_without_text_falls_through_to_paragraph() {
        assert_eq!(blocks("#"), vec![Block::Paragraph { text: "#".into() }]);
    }

    #[test]
    fn rule_requires_exact_marker() {
        assert_eq!(blocks("  ---  "), vec![Block::Rule]);
        assert_eq!(
            blocks("--- not a rule"),
            vec![Block::Paragraph {
                text: "--- not a rule".into()
            }]
        );
    }

    #[test]
    fn fence_captures_lines_verbatim() {
        let input = "```text\n  +---+\n  | **a** |\n```\nafter";
        assert_eq!(
            blocks(input),
            vec![
                Block::CodeBlock {
                    lines: vec!["  +---+".into(), "  | **a** |".into()]
                },
                Block::Paragraph {
                    text: "after".into()
                },
            ]
        );
    }

    #[test]
    fn only_a_bare_fence_closes_a_code_block() {
        let input = "```\nlet a = 1;\n```rust\nlet b = 2;\n```\nafter";
        assert_eq!(
            blocks(input),
            vec![
                Block::CodeBlock {
                    lines: vec!["let a = 1;".into(), "```rust".into(), "let b = 2;".into()]
                },
                Block::Paragraph {
                    text: "after".into()
                },
            ]
        );
    }

    #[test]
    fn empty_fence_yields_empty_code_block() {
        assert_eq!(blocks("```\n```"), vec![Block::CodeBlock { lines: vec![] }]);
    }

    #[test]
    fn unterminated_fence_runs_to_end_of_input() {
        let scanned = scan(&lines_from_str("intro\n```\n# not a heading\n\n- nor a list"));
        assert_eq!(scanned.len(), 2);
        assert_eq!(
            scanned[1].block,
            Block::CodeBlock {
                lines: vec!["# not a heading".into(), "".into(), "- nor a list".into()]
            }
        );
        assert_eq!(scanned[1].lines, 1..=4);
    }

    #[test]
    fn table_drops_separator_rows() {
        let input = "| A | B |\n| --- | --- |\n| 1 | 2 |";
        assert_eq!(
            blocks(input),
            vec![Block::Table {
                rows: vec![row(&["A", "B"]), row(&["1", "2"])]
            }]
        );
    }

    #[test]
    fn table_trims_wide_rows_to_header_width() {
        let input = "| A | B |\n|:--|--:|\n| 1 | 2 | 3 |\n| x |";
        assert_eq!(
            blocks(input),
            vec![Block::Table {
                rows: vec![row(&["A", "B"]), row(&["1", "2"]), row(&["x"])]
            }]
        );
    }

    #[test]
    fn table_cells_resolve_emphasis() {
        let input = "| **Name** | Role |\n| **Ana** | admin |";
        assert_eq!(
            blocks(input),
            vec![Block::Table {
                rows: vec![row(&["Name", "Role"]), row(&["Ana", "admin"])]
            }]
        );
    }

    #[test]
    fn table_of_separators_only_emits_nothing() {
        let scanned = scan(&lines_from_str("|---|---|\n| :-: |\nnext"));
        assert_eq!(scanned.len(), 1);
        assert_eq!(scanned[0].block, Block::Paragraph { text: "next".into() });
        assert_eq!(scanned[0].lines, 2..=2);
    }

    #[test]
    fn separator_between_data_rows_keeps_table_contiguous() {
        let input = "| A |\n| 1 |\n|---|\n| 2 |";
        assert_eq!(
            blocks(input),
            vec![Block::Table {
                rows: vec![row(&["A"]), row(&["1"]), row(&["2"])]
            }]
        );
    }

    #[test]
    fn list_items_strip_marker_and_emphasis() {
        assert_eq!(
            blocks("- First item\n* **Second** item\n2. Second step"),
            vec![
                Block::ListItem {
                    ordered: false,
                    text: "First item".into()
                },
                Block::ListItem {
                    ordered: false,
                    text: "Second item".into()
                },
                Block::ListItem {
                    ordered: true,
                    text: "Second step".into()
                },
            ]
        );
    }

    #[test]
    fn bare_markers_become_paragraphs() {
        assert_eq!(
            blocks("-\n3.\n12.no-space"),
            vec![
                Block::Paragraph { text: "-".into() },
                Block::Paragraph { text: "3.".into() },
                Block::Paragraph {
                    text: "12.no-space".into()
                },
            ]
        );
    }

    #[test]
    fn consecutive_plain_lines_stay_separate_paragraphs() {
        assert_eq!(
            blocks("first line\n  second line  "),
            vec![
                Block::Paragraph {
                    text: "first line".into()
                },
                Block::Paragraph {
                    text: "second line".into()
                },
            ]
        );
    }

    #[test]
    fn heading_text_keeps_emphasis_markers() {
        assert_eq!(
            blocks("## The **core**"),
            vec![Block::Heading {
                level: 2,
                text: "The **core**".into()
            }]
        );
    }

    #[test]
    fn byte_span_covers_consumed_lines() {
        let records = lines_from_str("intro\n```\ncode\n");
        let span = &records[1..];
        assert_eq!((byte_start(span), byte_end(span)), (6, 15));
        assert_eq!((byte_start(&[]), byte_end(&[])), (0, 0));
    }

    #[test]
    fn ranges_cover_every_consumed_line() {
        let scanned = scan(&lines_from_str("# T\n\n```\ncode\n```\n| a |\n|---|\n---"));
        let ranges: Vec<_> = scanned.iter().map(|s| s.lines.clone()).collect();
        assert_eq!(ranges, vec![0..=0, 2..=4, 5..=6, 7..=7]);
    }
}
