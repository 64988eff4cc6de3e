use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// One classified unit of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// `level` is the raw count of leading `#` characters and is never
    /// clamped here; deciding what a level 5+ heading looks like is up to the sink.
    Heading { level: usize, text: String },
    /// Lines between the fences, verbatim.
    CodeBlock { lines: Vec<String> },
    /// `rows[0]` is the header. Separator rows never appear.
    Table { rows: Vec<Vec<String>> },
    ListItem { ordered: bool, text: String },
    Rule,
    Paragraph { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKind {
    Heading,
    CodeBlock,
    Table,
    ListItem,
    Rule,
    Paragraph,
}

impl BlockKind {
    pub const ALL: &'static [BlockKind] = &[
        BlockKind::Heading,
        BlockKind::CodeBlock,
        BlockKind::Table,
        BlockKind::ListItem,
        BlockKind::Rule,
        BlockKind::Paragraph,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::CodeBlock => "code_block",
            BlockKind::Table => "table",
            BlockKind::ListItem => "list_item",
            BlockKind::Rule => "rule",
            BlockKind::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::CodeBlock { .. } => BlockKind::CodeBlock,
            Block::Table { .. } => BlockKind::Table,
            Block::ListItem { .. } => BlockKind::ListItem,
            Block::Rule => BlockKind::Rule,
            Block::Paragraph { .. } => BlockKind::Paragraph,
        }
    }
}

/// A block together with the zero-based source lines it consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedBlock {
    pub block: Block,
    pub lines: RangeInclusive<usize>,
}
