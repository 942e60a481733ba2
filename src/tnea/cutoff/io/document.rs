//! Paginated document export.
//!
//! The table is first laid out into a [`PagedDocument`]: fixed-size landscape
//! pages, a title repeated on every page, a `Page N of M` footer, and column
//! widths shared by all pages. A [`DocumentRenderer`] then turns the layout
//! into a file. The PDF renderer is only compiled with the `pdf` feature, so
//! callers obtain it through [`default_renderer`] and must handle `None`.

use std::path::Path;

use crate::tnea::cutoff::error::Result;
use crate::tnea::cutoff::model::{NOT_AVAILABLE, Table};

/// Title printed at the top of every page.
pub const DOCUMENT_TITLE: &str = "TNEA Cutoff Data";

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width relative to the font size.
const GLYPH_WIDTH_EM: f32 = 0.5;

/// Geometry of every page, in millimetres unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    pub header_mm: f32,
    pub footer_mm: f32,
    pub font_size_pt: f32,
    pub title_size_pt: f32,
}

impl PageLayout {
    /// A4 in landscape orientation.
    pub fn a4_landscape() -> Self {
        Self {
            width_mm: 297.0,
            height_mm: 210.0,
            margin_mm: 10.0,
            header_mm: 14.0,
            footer_mm: 8.0,
            font_size_pt: 5.0,
            title_size_pt: 12.0,
        }
    }

    pub fn line_height_mm(&self) -> f32 {
        self.font_size_pt * PT_TO_MM * 1.6
    }

    pub fn body_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Data rows fitting under the column header row on one page.
    pub fn rows_per_page(&self) -> usize {
        let body = self.height_mm - 2.0 * self.margin_mm - self.header_mm - self.footer_mm;
        let lines = (body / self.line_height_mm()).floor() as usize;
        lines.saturating_sub(1).max(1)
    }

    /// Approximate width of `chars` glyphs at `size_pt`.
    pub fn text_width_mm(&self, chars: usize, size_pt: f32) -> f32 {
        chars as f32 * size_pt * PT_TO_MM * GLYPH_WIDTH_EM
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::a4_landscape()
    }
}

/// Table content laid out for fixed-size pages.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedDocument {
    pub title: String,
    pub layout: PageLayout,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PagedDocument {
    /// Lays out the table with nulls shown as `N/A`.
    pub fn from_table(table: &Table, layout: PageLayout) -> Self {
        Self {
            title: DOCUMENT_TITLE.to_string(),
            layout,
            headers: table.headers(),
            rows: table.render_rows(NOT_AVAILABLE),
        }
    }

    /// Rows of each page. An empty table still yields one page of headers.
    pub fn pages(&self) -> Vec<&[Vec<String>]> {
        if self.rows.is_empty() {
            return vec![&self.rows[..]];
        }
        self.rows.chunks(self.layout.rows_per_page()).collect()
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.layout.rows_per_page()).max(1)
    }

    /// Footer text of a 1-based page number.
    pub fn footer(&self, page: usize) -> String {
        format!("Page {page} of {}", self.page_count())
    }

    /// Column widths proportional to the longest text of each column.
    pub fn column_widths(&self) -> Vec<f32> {
        let weights: Vec<f32> = self
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                // Header names may be truncated harder than cell values.
                let header = header.chars().count().div_ceil(2);
                longest.max(header).clamp(3, 40) as f32
            })
            .collect();
        let total: f32 = weights.iter().sum();
        if total == 0.0 {
            return weights;
        }
        let body = self.layout.body_width_mm();
        weights.iter().map(|weight| body * weight / total).collect()
    }

    /// Truncates `text` so it fits into `width_mm` at body font size.
    pub fn fit(&self, text: &str, width_mm: f32) -> String {
        let per_glyph = self.layout.text_width_mm(1, self.layout.font_size_pt);
        let capacity = ((width_mm - 1.0) / per_glyph).floor().max(1.0) as usize;
        if text.chars().count() <= capacity {
            return text.to_string();
        }
        let mut fitted: String = text.chars().take(capacity.saturating_sub(2)).collect();
        fitted.push_str("..");
        fitted
    }
}

/// Turns a laid out document into an output file.
pub trait DocumentRenderer {
    /// Format name used in diagnostics.
    fn name(&self) -> &'static str;

    fn render(&self, document: &PagedDocument, output: &Path) -> Result<()>;
}

/// Renderer compiled into this build, if any.
#[cfg(feature = "pdf")]
pub fn default_renderer() -> Option<Box<dyn DocumentRenderer>> {
    Some(Box::new(pdf::PdfRenderer))
}

/// Renderer compiled into this build, if any.
#[cfg(not(feature = "pdf"))]
pub fn default_renderer() -> Option<Box<dyn DocumentRenderer>> {
    None
}

#[cfg(feature = "pdf")]
pub use pdf::PdfRenderer;

#[cfg(feature = "pdf")]
mod pdf {
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::Path;

    use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
    use tracing::debug;

    use super::{DocumentRenderer, PT_TO_MM, PagedDocument};
    use crate::tnea::cutoff::error::{Result, ToolError};

    const LAYER_NAME: &str = "table";

    /// Renders pages with the built-in Helvetica fonts.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PdfRenderer;

    struct Fonts {
        regular: IndirectFontRef,
        bold: IndirectFontRef,
    }

    impl DocumentRenderer for PdfRenderer {
        fn name(&self) -> &'static str {
            "pdf"
        }

        fn render(&self, document: &PagedDocument, output: &Path) -> Result<()> {
            let layout = &document.layout;
            let (width, height) = (Mm(layout.width_mm), Mm(layout.height_mm));
            let (pdf, first_page, first_layer) =
                PdfDocument::new(document.title.as_str(), width, height, LAYER_NAME);
            let fonts = Fonts {
                regular: pdf
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(pdf_error)?,
                bold: pdf
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(pdf_error)?,
            };

            let widths = document.column_widths();
            let mut first = Some((first_page, first_layer));
            for (index, rows) in document.pages().into_iter().enumerate() {
                let (page, layer) = first
                    .take()
                    .unwrap_or_else(|| pdf.add_page(width, height, LAYER_NAME));
                let canvas = pdf.get_page(page).get_layer(layer);
                draw_page(&canvas, document, &widths, rows, index + 1, &fonts);
            }
            debug!(pages = document.page_count(), "document laid out");

            let file = File::create(output)?;
            pdf.save(&mut BufWriter::new(file)).map_err(pdf_error)?;
            Ok(())
        }
    }

    fn draw_page(
        canvas: &PdfLayerReference,
        document: &PagedDocument,
        widths: &[f32],
        rows: &[Vec<String>],
        page: usize,
        fonts: &Fonts,
    ) {
        let layout = &document.layout;
        let line = layout.line_height_mm();

        let title_width = layout.text_width_mm(document.title.chars().count(), layout.title_size_pt);
        canvas.use_text(
            document.title.as_str(),
            layout.title_size_pt,
            Mm((layout.width_mm - title_width) / 2.0),
            Mm(layout.height_mm - layout.margin_mm - layout.title_size_pt * PT_TO_MM),
            &fonts.bold,
        );

        let mut y = layout.height_mm - layout.margin_mm - layout.header_mm;
        draw_row(canvas, document, widths, &document.headers, y, &fonts.bold);
        for row in rows {
            y -= line;
            draw_row(canvas, document, widths, row, y, &fonts.regular);
        }

        let footer = document.footer(page);
        let footer_width = layout.text_width_mm(footer.chars().count(), layout.font_size_pt);
        canvas.use_text(
            footer,
            layout.font_size_pt,
            Mm((layout.width_mm - footer_width) / 2.0),
            Mm(layout.margin_mm),
            &fonts.regular,
        );
    }

    fn draw_row(
        canvas: &PdfLayerReference,
        document: &PagedDocument,
        widths: &[f32],
        cells: &[String],
        y: f32,
        font: &IndirectFontRef,
    ) {
        let mut x = document.layout.margin_mm;
        for (cell, width) in cells.iter().zip(widths) {
            canvas.use_text(
                document.fit(cell, *width),
                document.layout.font_size_pt,
                Mm(x),
                Mm(y),
                font,
            );
            x += width;
        }
    }

    fn pdf_error(error: impl std::fmt::Display) -> ToolError {
        ToolError::Pdf(error.to_string())
    }
}
