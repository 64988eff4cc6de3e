//! Single-file Word XML (Flat OPC) serialization of a [`DocumentModel`].
//!
//! The package carries the main document part, a styles part built from
//! [`StyleSettings`] and a numbering part backing the two list styles. Word
//! opens the file directly; no archive is involved.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};
use markdown_docx_config::{StyleSettings, MAX_STRUCTURAL_HEADING_LEVEL};

use crate::model::{Alignment, DocumentModel, Element, Paragraph, ParagraphStyle, Run, TableGrid};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const PKG_NS: &str = "http://schemas.microsoft.com/office/2006/xmlPackage";
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const BULLET_NUM_ID: u32 = 1;
const DECIMAL_NUM_ID: u32 = 2;

/// Title size in points; headings step down from here.
const TITLE_SIZE_PT: f32 = 26.0;
const HEADING_SIZES_PT: [f32; 4] = [16.0, 13.0, 12.0, 11.0];

pub fn to_word_xml(model: &DocumentModel, style: &StyleSettings) -> String {
    let mut out = String::with_capacity(4096 + model.elements.len() * 256);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    out.push_str("<?mso-application progid=\"Word.Document\"?>\n");
    let _ = write!(out, "<pkg:package xmlns:pkg=\"{PKG_NS}\">");

    part(
        &mut out,
        "/_rels/.rels",
        "application/vnd.openxmlformats-package.relationships+xml",
        &relationships(&[("rId1", "officeDocument", "word/document.xml")]),
    );
    part(
        &mut out,
        "/word/_rels/document.xml.rels",
        "application/vnd.openxmlformats-package.relationships+xml",
        &relationships(&[
            ("rId1", "styles", "styles.xml"),
            ("rId2", "numbering", "numbering.xml"),
        ]),
    );
    part(
        &mut out,
        "/word/document.xml",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        &document_part(model),
    );
    part(
        &mut out,
        "/word/styles.xml",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        &styles_part(style),
    );
    part(
        &mut out,
        "/word/numbering.xml",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml",
        &numbering_part(),
    );

    out.push_str("</pkg:package>\n");
    out
}

fn part(out: &mut String, name: &str, content_type: &str, xml: &str) {
    let _ = write!(
        out,
        "<pkg:part pkg:name=\"{name}\" pkg:contentType=\"{content_type}\"><pkg:xmlData>{xml}</pkg:xmlData></pkg:part>"
    );
}

fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!("<Relationships xmlns=\"{RELS_NS}\">");
    for (id, kind, target) in entries {
        let _ = write!(
            xml,
            "<Relationship Id=\"{id}\" Type=\"{REL_TYPE_BASE}/{kind}\" Target=\"{target}\"/>"
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn document_part(model: &DocumentModel) -> String {
    let mut xml = format!("<w:document xmlns:w=\"{WORD_NS}\"><w:body>");
    for element in &model.elements {
        match element {
            Element::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph),
            Element::Table(table) => write_table(&mut xml, table),
        }
    }
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &Paragraph) {
    xml.push_str("<w:p><w:pPr>");
    let _ = write!(xml, "<w:pStyle w:val=\"{}\"/>", paragraph.style.style_id());
    if paragraph.space_before_pt.is_some() || paragraph.space_after_pt.is_some() {
        xml.push_str("<w:spacing");
        if let Some(before) = paragraph.space_before_pt {
            let _ = write!(xml, " w:before=\"{}\"", twips(before));
        }
        if let Some(after) = paragraph.space_after_pt {
            let _ = write!(xml, " w:after=\"{}\"", twips(after));
        }
        xml.push_str("/>");
    }
    if paragraph.alignment == Alignment::Center {
        xml.push_str("<w:jc w:val=\"center\"/>");
    }
    xml.push_str("</w:pPr>");

    for run in &paragraph.runs {
        write_run(xml, run);
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r>");
    let has_properties =
        run.bold || run.font.is_some() || run.size_pt.is_some() || run.color.is_some();
    if has_properties {
        xml.push_str("<w:rPr>");
        if let Some(font) = &run.font {
            write_fonts(xml, font);
        }
        if run.bold {
            xml.push_str("<w:b/>");
        }
        if let Some(color) = &run.color {
            let _ = write!(xml, "<w:color w:val=\"{}\"/>", encode_double_quoted_attribute(color));
        }
        if let Some(size) = run.size_pt {
            let _ = write!(xml, "<w:sz w:val=\"{}\"/>", half_points(size));
        }
        xml.push_str("</w:rPr>");
    }
    let _ = write!(
        xml,
        "<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        encode_text(&xml_safe(&run.text))
    );
}

fn write_fonts(xml: &mut String, font: &str) {
    let font = encode_double_quoted_attribute(font);
    let _ = write!(
        xml,
        "<w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\" w:cs=\"{font}\"/>"
    );
}

fn write_table(xml: &mut String, table: &TableGrid) {
    xml.push_str("<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/><w:tblBorders>");
    let color = encode_double_quoted_attribute(&table.border_color);
    for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        let _ = write!(
            xml,
            "<w:{edge} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"{color}\"/>"
        );
    }
    xml.push_str("</w:tblBorders></w:tblPr><w:tblGrid>");
    for _ in 0..table.columns {
        xml.push_str("<w:gridCol/>");
    }
    xml.push_str("</w:tblGrid>");

    for row in &table.rows {
        xml.push_str("<w:tr>");
        for cell in row {
            xml.push_str("<w:tc>");
            if let Some(fill) = &cell.fill {
                let _ = write!(
                    xml,
                    "<w:tcPr><w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/></w:tcPr>",
                    encode_double_quoted_attribute(fill)
                );
            }
            let run = Run {
                text: cell.text.clone(),
                bold: cell.bold,
                color: cell.color.clone(),
                ..Run::default()
            };
            write_paragraph(xml, &Paragraph::new(ParagraphStyle::Normal, vec![run]));
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
}

fn styles_part(style: &StyleSettings) -> String {
    let mut xml = format!("<w:styles xmlns:w=\"{WORD_NS}\">");

    xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    write_fonts(&mut xml, &style.body_font);
    let _ = write!(xml, "<w:sz w:val=\"{}\"/>", half_points(style.body_size_pt));
    xml.push_str("</w:rPr></w:rPrDefault></w:docDefaults>");

    xml.push_str(
        "<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\"><w:name w:val=\"Normal\"/>",
    );
    xml.push_str("<w:pPr><w:spacing w:after=\"160\"/></w:pPr><w:rPr>");
    write_fonts(&mut xml, &style.body_font);
    let _ = write!(xml, "<w:sz w:val=\"{}\"/>", half_points(style.body_size_pt));
    xml.push_str("</w:rPr></w:style>");

    let _ = write!(
        xml,
        "<w:style w:type=\"paragraph\" w:styleId=\"Title\"><w:name w:val=\"Title\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:pPr><w:spacing w:after=\"240\"/></w:pPr><w:rPr><w:b/><w:sz w:val=\"{}\"/></w:rPr></w:style>",
        half_points(TITLE_SIZE_PT)
    );

    for level in 1..=MAX_STRUCTURAL_HEADING_LEVEL {
        let size = HEADING_SIZES_PT
            .get(usize::from(level) - 1)
            .copied()
            .unwrap_or(style.body_size_pt);
        let _ = write!(
            xml,
            "<w:style w:type=\"paragraph\" w:styleId=\"Heading{level}\"><w:name w:val=\"heading {level}\"/><w:basedOn w:val=\"Normal\"/><w:next w:val=\"Normal\"/><w:pPr><w:keepNext/><w:spacing w:before=\"240\" w:after=\"80\"/><w:outlineLvl w:val=\"{}\"/></w:pPr><w:rPr><w:b/><w:sz w:val=\"{}\"/></w:rPr></w:style>",
            level - 1,
            half_points(size)
        );
    }

    for (style_id, name, num_id) in [
        ("ListBullet", "List Bullet", BULLET_NUM_ID),
        ("ListNumber", "List Number", DECIMAL_NUM_ID),
    ] {
        let _ = write!(
            xml,
            "<w:style w:type=\"paragraph\" w:styleId=\"{style_id}\"><w:name w:val=\"{name}\"/><w:basedOn w:val=\"Normal\"/><w:pPr><w:numPr><w:numId w:val=\"{num_id}\"/></w:numPr><w:spacing w:after=\"60\"/><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr></w:style>"
        );
    }

    let spacing = twips(style.code_spacing_pt);
    let _ = write!(
        xml,
        "<w:style w:type=\"paragraph\" w:customStyle=\"1\" w:styleId=\"CodeBlock\"><w:name w:val=\"Code Block\"/><w:basedOn w:val=\"Normal\"/><w:pPr><w:spacing w:before=\"{spacing}\" w:after=\"{spacing}\"/></w:pPr><w:rPr>"
    );
    write_fonts(&mut xml, &style.code_font);
    let _ = write!(xml, "<w:sz w:val=\"{}\"/>", half_points(style.code_size_pt));
    xml.push_str("</w:rPr></w:style>");

    xml.push_str("</w:styles>");
    xml
}

fn numbering_part() -> String {
    let mut xml = format!("<w:numbering xmlns:w=\"{WORD_NS}\">");
    for (abstract_id, format, text) in [(0, "bullet", "\u{2022}"), (1, "decimal", "%1.")] {
        let _ = write!(
            xml,
            "<w:abstractNum w:abstractNumId=\"{abstract_id}\"><w:multiLevelType w:val=\"singleLevel\"/><w:lvl w:ilvl=\"0\"><w:start w:val=\"1\"/><w:numFmt w:val=\"{format}\"/><w:lvlText w:val=\"{text}\"/><w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"720\" w:hanging=\"360\"/></w:pPr></w:lvl></w:abstractNum>"
        );
    }
    for (num_id, abstract_id) in [(BULLET_NUM_ID, 0), (DECIMAL_NUM_ID, 1)] {
        let _ = write!(
            xml,
            "<w:num w:numId=\"{num_id}\"><w:abstractNumId w:val=\"{abstract_id}\"/></w:num>"
        );
    }
    xml.push_str("</w:numbering>");
    xml
}

/// Point value in twentieths of a point.
fn twips(points: f32) -> u32 {
    (points * 20.0).round().max(0.0) as u32
}

fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(1.0) as u32
}

/// Drops characters XML 1.0 cannot carry: C0 controls other than tab, LF
/// and CR, plus the noncharacters U+FFFE and U+FFFF.
fn xml_safe(text: &str) -> std::borrow::Cow<'_, str> {
    let forbidden = |ch: char| {
        (ch < '\u{20}' && !matches!(ch, '\t' | '\n' | '\r'))
            || matches!(ch, '\u{FFFE}' | '\u{FFFF}')
    };
    if text.chars().any(forbidden) {
        std::borrow::Cow::Owned(text.chars().filter(|&ch| !forbidden(ch)).collect())
    } else {
        std::borrow::Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableCell;

    fn model_with(elements: Vec<Element>) -> DocumentModel {
        DocumentModel { elements }
    }

    #[test]
    fn escapes_text_and_preserves_whitespace() {
        let model = model_with(vec![Element::Paragraph(Paragraph::new(
            ParagraphStyle::Code,
            vec![Run::plain("  if a < b && c > d  ")],
        ))]);
        let xml = to_word_xml(&model, &StyleSettings::default());

        assert!(xml.contains(
            "<w:t xml:space=\"preserve\">  if a &lt; b &amp;&amp; c &gt; d  </w:t>"
        ));
        assert!(xml.contains("<w:pStyle w:val=\"CodeBlock\"/>"));
    }

    #[test]
    fn writes_title_alignment_and_spacing() {
        let mut title = Paragraph::new(ParagraphStyle::Title, vec![Run::plain("Doc")]);
        title.alignment = Alignment::Center;
        let model = model_with(vec![
            Element::Paragraph(title),
            Element::Paragraph(Paragraph::spacer(Some(12.0), Some(12.0))),
        ]);
        let xml = to_word_xml(&model, &StyleSettings::default());

        assert!(xml.contains("<w:pStyle w:val=\"Title\"/><w:jc w:val=\"center\"/>"));
        assert!(xml.contains("<w:spacing w:before=\"240\" w:after=\"240\"/>"));
    }

    #[test]
    fn writes_bordered_table_with_shaded_header() {
        let table = TableGrid {
            columns: 2,
            rows: vec![
                vec![
                    TableCell {
                        text: "A".into(),
                        bold: true,
                        color: Some("FFFFFF".into()),
                        fill: Some("003366".into()),
                    },
                    TableCell {
                        text: "B".into(),
                        bold: true,
                        color: Some("FFFFFF".into()),
                        fill: Some("003366".into()),
                    },
                ],
                vec![TableCell::default(), TableCell::default()],
            ],
            border_color: "000000".into(),
        };
        let xml = to_word_xml(&model_with(vec![Element::Table(table)]), &StyleSettings::default());

        assert_eq!(xml.matches("<w:gridCol/>").count(), 2);
        assert_eq!(xml.matches("<w:tc>").count(), 4);
        assert_eq!(xml.matches("w:fill=\"003366\"").count(), 2);
        assert!(xml.contains("<w:insideV w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"000000\"/>"));
        assert!(xml.contains("<w:rPr><w:b/><w:color w:val=\"FFFFFF\"/></w:rPr><w:t xml:space=\"preserve\">A</w:t>"));
    }

    #[test]
    fn styles_follow_settings() {
        let style = StyleSettings {
            body_font: "Arial".into(),
            code_size_pt: 8.0,
            ..StyleSettings::default()
        };
        let xml = to_word_xml(&DocumentModel::new(), &style);

        assert!(xml.contains("w:ascii=\"Arial\""));
        assert!(xml.contains("<w:name w:val=\"Code Block\"/>"));
        assert!(xml.contains("<w:sz w:val=\"16\"/>"));
        assert!(xml.contains("w:styleId=\"Heading9\""));
        assert!(xml.contains("<w:numFmt w:val=\"decimal\"/>"));
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(xml_safe("a\u{0}b\tc"), "ab\tc");
        assert_eq!(xml_safe("x\u{FFFE}y\u{FFFF}z\u{FFFD}"), "xyz\u{FFFD}");
        assert!(matches!(xml_safe("plain"), std::borrow::Cow::Borrowed(_)));
    }
}
