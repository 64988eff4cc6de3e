//! In-memory rich-text document: styled paragraphs and bordered tables.

use serde::Serialize;

use crate::error::SinkResult;
use crate::sink::DocumentSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    Normal,
    Title,
    Heading(u8),
    ListBullet,
    ListNumber,
    Code,
}

impl ParagraphStyle {
    /// Style identifier used in the word-processing markup.
    pub fn style_id(self) -> String {
        match self {
            ParagraphStyle::Normal => "Normal".to_owned(),
            ParagraphStyle::Title => "Title".to_owned(),
            ParagraphStyle::Heading(level) => format!("Heading{level}"),
            ParagraphStyle::ListBullet => "ListBullet".to_owned(),
            ParagraphStyle::ListNumber => "ListNumber".to_owned(),
            ParagraphStyle::Code => "CodeBlock".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// A span of text sharing one set of character attributes. `None` fields
/// inherit from the paragraph style.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_pt: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            ..Run::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            bold: true,
            ..Run::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub alignment: Alignment,
    pub runs: Vec<Run>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_before_pt: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_after_pt: Option<f32>,
}

impl Paragraph {
    pub fn new(style: ParagraphStyle, runs: Vec<Run>) -> Self {
        Paragraph {
            style,
            alignment: Alignment::Left,
            runs,
            space_before_pt: None,
            space_after_pt: None,
        }
    }

    /// Empty paragraph used purely for vertical spacing.
    pub fn spacer(before_pt: Option<f32>, after_pt: Option<f32>) -> Self {
        Paragraph {
            space_before_pt: before_pt,
            space_after_pt: after_pt,
            ..Paragraph::new(ParagraphStyle::Normal, Vec::new())
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableCell {
    pub text: String,
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

/// Rectangular grid; every row holds exactly `columns` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableGrid {
    pub columns: usize,
    pub rows: Vec<Vec<TableCell>>,
    pub border_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Paragraph(Paragraph),
    Table(TableGrid),
}

/// Collects sink output in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentModel {
    pub elements: Vec<Element>,
}

impl DocumentModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.elements.iter().filter_map(|element| match element {
            Element::Paragraph(paragraph) => Some(paragraph),
            Element::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableGrid> {
        self.elements.iter().filter_map(|element| match element {
            Element::Table(table) => Some(table),
            Element::Paragraph(_) => None,
        })
    }
}

impl DocumentSink for DocumentModel {
    fn paragraph(&mut self, paragraph: Paragraph) -> SinkResult<()> {
        self.elements.push(Element::Paragraph(paragraph));
        Ok(())
    }

    fn table(&mut self, table: TableGrid) -> SinkResult<()> {
        self.elements.push(Element::Table(table));
        Ok(())
    }
}
