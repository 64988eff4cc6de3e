//! Document sink for markdown-docx: maps scanned blocks onto styled
//! paragraphs and tables, and serializes the result.

mod error;
mod fs;
mod model;
mod render;
mod sink;
mod word_xml;

pub use error::{SinkError, SinkResult};
pub use model::{
    Alignment, DocumentModel, Element, Paragraph, ParagraphStyle, Run, TableCell, TableGrid,
};
pub use render::{render_blocks, RenderSummary};
pub use sink::DocumentSink;
pub use word_xml::to_word_xml;

use std::path::Path;

use markdown_docx_config::{OutputFormat, StyleSettings};
use markdown_docx_scan::Block;

pub fn to_json(model: &DocumentModel) -> SinkResult<String> {
    Ok(serde_json::to_string_pretty(model)?)
}

/// Serializes `model` in `format` and writes it to `path`.
pub fn write_document(
    model: &DocumentModel,
    style: &StyleSettings,
    format: OutputFormat,
    path: &Path,
) -> SinkResult<()> {
    let content = match format {
        OutputFormat::WordXml => to_word_xml(model, style),
        OutputFormat::Json => to_json(model)?,
    };

    fs::write_atomic(path, content.as_bytes()).map_err(|source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} document to {}", format, path.display());
    Ok(())
}

/// Renders `blocks` into a fresh [`DocumentModel`].
pub fn build_document(
    blocks: &[Block],
    style: &StyleSettings,
) -> SinkResult<(DocumentModel, RenderSummary)> {
    let mut model = DocumentModel::new();
    let summary = render_blocks(blocks, style, &mut model)?;
    Ok((model, summary))
}

/// Reads markdown from `input`, converts it and writes the document to `output`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    style: &StyleSettings,
) -> SinkResult<RenderSummary> {
    let blocks = markdown_docx_scan::scan_from_path(input).map_err(|source| SinkError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let (model, summary) = build_document(&blocks, style)?;
    write_document(&model, style, format, output)?;
    Ok(summary)
}
