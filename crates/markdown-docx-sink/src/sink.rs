use crate::error::SinkResult;
use crate::model::{Alignment, Paragraph, ParagraphStyle, Run, TableGrid};

/// Receiver of rendered document elements, in document order.
pub trait DocumentSink {
    fn paragraph(&mut self, paragraph: Paragraph) -> SinkResult<()>;

    fn table(&mut self, table: TableGrid) -> SinkResult<()>;

    fn heading(&mut self, style: ParagraphStyle, text: &str, alignment: Alignment) -> SinkResult<()> {
        let mut paragraph = Paragraph::new(style, vec![Run::plain(text)]);
        paragraph.alignment = alignment;
        self.paragraph(paragraph)
    }

    fn spacer(&mut self, before_pt: Option<f32>, after_pt: Option<f32>) -> SinkResult<()> {
        self.paragraph(Paragraph::spacer(before_pt, after_pt))
    }
}
