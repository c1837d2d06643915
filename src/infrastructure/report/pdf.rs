//! Minimal PDF 1.4 writer for text reports
//!
//! Produces A4 pages with the standard Helvetica fonts, so no font data is
//! embedded. Characters outside Latin-1 are replaced with `?`.

use bytes::Bytes;

use crate::domain::{RagError, ReportComposer, ReportDocument};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Page geometry and typography, in PDF points
#[derive(Debug, Clone)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub body_indent: f32,
    pub title_size: f32,
    pub field_size: f32,
    pub body_size: f32,
    pub line_height: f32,
    pub bottom_margin: f32,
    /// Body lines longer than this many characters are split
    pub wrap_columns: usize,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin_left: 50.0,
            body_indent: 60.0,
            title_size: 16.0,
            field_size: 12.0,
            body_size: 11.0,
            line_height: 15.0,
            bottom_margin: 50.0,
            wrap_columns: 90,
        }
    }
}

#[derive(Debug)]
struct TextRun {
    font: &'static str,
    size: f32,
    x: f32,
    y: f32,
    text: String,
}

#[derive(Debug, Default)]
pub struct PdfReportComposer {
    layout: PdfLayout,
}

impl PdfReportComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: PdfLayout) -> Self {
        Self { layout }
    }

    fn layout_pages(&self, document: &ReportDocument) -> Vec<Vec<TextRun>> {
        let l = &self.layout;
        let top = l.page_height - l.margin_left;

        let mut pages = Vec::new();
        let mut current = vec![TextRun {
            font: BOLD_FONT,
            size: l.title_size,
            x: l.margin_left,
            y: top,
            text: document.title.clone(),
        }];

        let mut y = top - 30.0;
        for (label, value) in &document.fields {
            current.push(TextRun {
                font: REGULAR_FONT,
                size: l.field_size,
                x: l.margin_left,
                y,
                text: format!("{}: {}", label, value),
            });
            y -= 20.0;
        }

        y -= 20.0;
        for line in document.body.lines() {
            for segment in wrap(line, l.wrap_columns) {
                if y < l.bottom_margin {
                    pages.push(std::mem::take(&mut current));
                    y = top;
                }

                current.push(TextRun {
                    font: REGULAR_FONT,
                    size: l.body_size,
                    x: l.body_indent,
                    y,
                    text: segment,
                });
                y -= l.line_height;
            }
        }

        pages.push(current);
        pages.retain(|page| !page.is_empty());
        pages
    }

    fn render(&self, pages: &[Vec<TextRun>]) -> Vec<u8> {
        let page_count = pages.len();
        // catalog, page tree, two fonts, then a page and a content stream per page
        let first_page_id = 5;
        let object_count = 4 + page_count * 2;

        let mut objects: Vec<String> = Vec::with_capacity(object_count);
        let kids = (0..page_count)
            .map(|i| format!("{} 0 R", first_page_id + i * 2))
            .collect::<Vec<_>>()
            .join(" ");

        objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
        objects.push(format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids, page_count
        ));
        objects.push(font_object("Helvetica"));
        objects.push(font_object("Helvetica-Bold"));

        for (i, runs) in pages.iter().enumerate() {
            let content_id = first_page_id + i * 2 + 1;
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /{} 3 0 R /{} 4 0 R >> >> /Contents {} 0 R >>",
                fmt_num(self.layout.page_width),
                fmt_num(self.layout.page_height),
                REGULAR_FONT,
                BOLD_FONT,
                content_id
            ));

            let stream = content_stream(runs);
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref_offset = out.len();
        out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for offset in offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));

        out.into_bytes()
    }
}

impl ReportComposer for PdfReportComposer {
    fn compose(&self, document: &ReportDocument) -> Result<Bytes, RagError> {
        let pages = self.layout_pages(document);
        if pages.is_empty() {
            return Err(RagError::internal("report layout produced no pages"));
        }

        tracing::debug!(pages = pages.len(), title = %document.title, "Rendering PDF report");
        Ok(Bytes::from(self.render(&pages)))
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }
}

fn font_object(base_font: &str) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        base_font
    )
}

fn content_stream(runs: &[TextRun]) -> String {
    runs.iter()
        .map(|run| {
            format!(
                "BT /{} {} Tf {} {} Td ({}) Tj ET",
                run.font,
                fmt_num(run.size),
                fmt_num(run.x),
                fmt_num(run.y),
                escape_text(&run.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits a line into chunks of at most `columns` characters; empty lines stay as one empty chunk
fn wrap(line: &str, columns: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() || columns == 0 {
        return vec![line.to_string()];
    }

    chars
        .chunks(columns)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Escapes a string for a PDF literal, keeping the output 7-bit
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            '\t' => escaped.push(' '),
            c if (0xA0..=0xFF).contains(&(c as u32)) => {
                escaped.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => escaped.push('?'),
        }
    }

    escaped
}

fn fmt_num(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuditReportRequest;

    fn render(body: &str) -> String {
        let request = AuditReportRequest::new("Jharkhand", "2023", "Gas Leak");
        let document = ReportDocument::audit(&request, body);
        let bytes = PdfReportComposer::new().compose(&document).unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let pdf = render("Total incidents: 4");

        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("/Count 1"));
        assert!(pdf.contains("BT /F2 16 Tf 50 792 Td (Mining Safety Audit Report) Tj ET"));
        assert!(pdf.contains("(State: Jharkhand) Tj"));
        assert!(pdf.contains("(Hazard Type: Gas Leak) Tj"));
        assert!(pdf.contains("BT /F1 11 Tf 60 682 Td (Total incidents: 4) Tj ET"));
    }

    #[test]
    fn test_startxref_points_at_xref_table() {
        let pdf = render("body");

        let marker = "startxref\n";
        let start = pdf.rfind(marker).unwrap() + marker.len();
        let offset: usize = pdf[start..].lines().next().unwrap().parse().unwrap();

        assert!(pdf[offset..].starts_with("xref\n0 7\n"));
    }

    #[test]
    fn test_long_body_breaks_pages() {
        let body = (1..=100)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");

        let pdf = render(&body);

        // 43 lines fit under the header, 50 on a full page
        assert!(pdf.contains("/Count 3"));
        assert!(pdf.contains("BT /F1 11 Tf 60 792 Td (line 44) Tj ET"));
        assert!(pdf.contains("BT /F1 11 Tf 60 792 Td (line 94) Tj ET"));
    }

    #[test]
    fn test_wrap_at_columns() {
        let line = "a".repeat(200);
        let segments = wrap(&line, 90);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 90);
        assert_eq!(segments[2].len(), 20);
        assert_eq!(wrap("", 90), vec![String::new()]);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text(r"(a)\b"), r"\(a\)\\b");
        assert_eq!(escape_text("café"), r"caf\351");
        assert_eq!(escape_text("⚠ risk"), "? risk");
    }

    #[test]
    fn test_composer_metadata() {
        let composer = PdfReportComposer::new();
        assert_eq!(composer.content_type(), "application/pdf");
        assert_eq!(composer.file_extension(), "pdf");
    }
}
