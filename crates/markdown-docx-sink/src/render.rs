use std::collections::BTreeMap;

use markdown_docx_config::StyleSettings;
use markdown_docx_scan::{Block, BlockKind};

use crate::error::SinkResult;
use crate::model::{Alignment, Paragraph, ParagraphStyle, Run, TableCell, TableGrid};
use crate::sink::DocumentSink;

/// Counts of what a render pass consumed and produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub blocks: BTreeMap<BlockKind, usize>,
    pub paragraphs: usize,
    pub tables: usize,
}

impl RenderSummary {
    pub fn count(&self, kind: BlockKind) -> usize {
        self.blocks.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_blocks(&self) -> usize {
        self.blocks.values().sum()
    }
}

/// Maps each block onto sink calls.
///
/// Level 1 headings become the document title, levels up to
/// `style.max_heading_level` become structural headings and anything deeper
/// is demoted to a bold body paragraph. Code lines keep their whitespace and
/// get one paragraph each; tables are followed by a spacer paragraph.
pub fn render_blocks<S>(
    blocks: &[Block],
    style: &StyleSettings,
    sink: &mut S,
) -> SinkResult<RenderSummary>
where
    S: DocumentSink + ?Sized,
{
    let mut renderer = Renderer {
        style,
        sink,
        summary: RenderSummary::default(),
    };

    for block in blocks {
        *renderer.summary.blocks.entry(block.kind()).or_insert(0) += 1;
        renderer.block(block)?;
    }

    let summary = renderer.summary;
    log::debug!(
        "rendered {} blocks into {} paragraphs and {} tables",
        summary.total_blocks(),
        summary.paragraphs,
        summary.tables
    );
    Ok(summary)
}

struct Renderer<'a, S: ?Sized> {
    style: &'a StyleSettings,
    sink: &'a mut S,
    summary: RenderSummary,
}

impl<S: DocumentSink + ?Sized> Renderer<'_, S> {
    fn block(&mut self, block: &Block) -> SinkResult<()> {
        match block {
            Block::Heading { level, text } => self.heading(*level, text),
            Block::CodeBlock { lines } => {
                for line in lines {
                    let run = Run {
                        text: line.clone(),
                        font: Some(self.style.code_font.clone()),
                        size_pt: Some(self.style.code_size_pt),
                        ..Run::default()
                    };
                    self.paragraph(Paragraph::new(ParagraphStyle::Code, vec![run]))?;
                }
                Ok(())
            }
            Block::Table { rows } => self.table(rows),
            Block::ListItem { ordered, text } => {
                let style = if *ordered {
                    ParagraphStyle::ListNumber
                } else {
                    ParagraphStyle::ListBullet
                };
                self.paragraph(Paragraph::new(style, vec![Run::plain(text.as_str())]))
            }
            Block::Rule => {
                let spacing = Some(self.style.rule_spacing_pt);
                self.summary.paragraphs += 1;
                self.sink.spacer(spacing, spacing)
            }
            Block::Paragraph { text } => self.paragraph(Paragraph::new(
                ParagraphStyle::Normal,
                vec![Run::plain(text.as_str())],
            )),
        }
    }

    fn heading(&mut self, level: usize, text: &str) -> SinkResult<()> {
        self.summary.paragraphs += 1;
        if level == 1 {
            let alignment = if self.style.center_title {
                Alignment::Center
            } else {
                Alignment::Left
            };
            return self.sink.heading(ParagraphStyle::Title, text, alignment);
        }

        if level <= usize::from(self.style.max_heading_level) {
            // Bounded by max_heading_level, which the config keeps within u8.
            let level = level as u8;
            return self
                .sink
                .heading(ParagraphStyle::Heading(level), text, Alignment::Left);
        }

        self.sink.paragraph(Paragraph::new(
            ParagraphStyle::Normal,
            vec![Run::bold(text)],
        ))
    }

    fn table(&mut self, rows: &[Vec<String>]) -> SinkResult<()> {
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if columns == 0 {
            log::warn!("skipping table without header cells");
            return Ok(());
        }

        let grid_rows: Vec<Vec<TableCell>> = rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                (0..columns)
                    .map(|col_idx| {
                        let text = row.get(col_idx).cloned().unwrap_or_default();
                        if row_idx == 0 {
                            TableCell {
                                text,
                                bold: true,
                                color: Some(self.style.header_text_color.to_string()),
                                fill: Some(self.style.header_fill.to_string()),
                            }
                        } else {
                            TableCell {
                                text,
                                ..TableCell::default()
                            }
                        }
                    })
                    .collect()
            })
            .collect();

        self.summary.tables += 1;
        self.sink.table(TableGrid {
            columns,
            rows: grid_rows,
            border_color: self.style.border_color.to_string(),
        })?;

        self.summary.paragraphs += 1;
        self.sink.spacer(None, None)
    }

    fn paragraph(&mut self, paragraph: Paragraph) -> SinkResult<()> {
        self.summary.paragraphs += 1;
        self.sink.paragraph(paragraph)
    }
}
