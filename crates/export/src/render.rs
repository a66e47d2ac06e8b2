//! PDF rendering of a [`ReportLayout`] with `printpdf`.
//!
//! Coordinates in this module are written top-down in millimetres from the top-left corner of
//! an A4 page and converted to PDF's bottom-up space when drawn.

use crate::layout::{
    ReportLayout, Rgb8, ALTERNATE_ROW, BLACK, BRAND_PURPLE, FOOTER, FOOTER_GREY, MASTHEAD,
    SIDE_MARKER, TABLE_HEADINGS, TAGLINE, TAGLINE_GREY, WHITE,
};
use crate::{ExportError, ExportResult};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Pt, Rect, Rgb, TextMatrix,
};
use std::io::BufWriter;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LAYER_NAME: &str = "Layer 1";

const LEFT: f32 = 20.0;
const VALUES_X: f32 = 50.0;
const DATES_X: f32 = 140.0;
const TABLE_TOP: f32 = 105.0;
const TABLE_TOP_CONTINUED: f32 = 20.0;
const TABLE_BOTTOM: f32 = 280.0;
const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 2.0;
const COLUMN_WIDTHS: [f32; 4] = [50.0, 40.0, 50.0, 30.0];
const SUMMARY_TOP: f32 = 95.0;
const SUMMARY_LINE_HEIGHT: f32 = 5.0;

/// Renders `layout` to PDF bytes.
///
/// # Errors
///
/// Returns [`ExportError::Render`] if fonts cannot be registered or the document cannot be
/// serialised.
pub fn render_pdf(layout: &ReportLayout) -> ExportResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        &layout.document_title,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        LAYER_NAME,
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Render(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Render(format!("PDF font error: {e}")))?;

    let first = doc.get_page(page).get_layer(layer);
    let mut canvas = Canvas {
        doc: &doc,
        font,
        bold,
        layers: vec![first],
    };

    canvas.draw_header(layout);
    let summary_end = canvas.draw_summary(layout);
    let table_start = if canvas.layers.len() > 1 {
        summary_end + 5.0
    } else {
        TABLE_TOP.max(summary_end + 5.0)
    };
    canvas.draw_table(layout, table_start);
    canvas.draw_footers();

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Render(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Render(format!("PDF buffer error: {e}")))
}

struct Canvas<'a> {
    doc: &'a PdfDocumentReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    layers: Vec<PdfLayerReference>,
}

fn color(c: Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(c.0) / 255.0,
        f32::from(c.1) / 255.0,
        f32::from(c.2) / 255.0,
        None,
    ))
}

/// Whether a block of `height` starting at `top` would run past the table area.
fn overflows(top: f32, height: f32) -> bool {
    top + height > TABLE_BOTTOM
}

/// Converts a top-down y coordinate to PDF space.
fn y(top: f32) -> Mm {
    Mm(PAGE_HEIGHT - top)
}

fn point(x: f32, top: f32) -> (Point, bool) {
    (Point::new(Mm(x), y(top)), false)
}

impl Canvas<'_> {
    fn layer(&self) -> &PdfLayerReference {
        // `layers` always holds the first page.
        &self.layers[self.layers.len() - 1]
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        let layer = self.doc.get_page(page).get_layer(layer);
        self.layers.push(layer);
    }

    fn text(&self, text: &str, size: f32, x: f32, top: f32, fill: Rgb8, bold: bool) {
        let layer = self.layer();
        layer.set_fill_color(color(fill));
        let font = if bold { &self.bold } else { &self.font };
        layer.use_text(text, size, Mm(x), y(top), font);
    }

    fn line(&self, points: Vec<(Point, bool)>, closed: bool, stroke: Rgb8) {
        let layer = self.layer();
        layer.set_outline_color(color(stroke));
        layer.set_outline_thickness(0.5);
        layer.add_line(Line {
            points,
            is_closed: closed,
        });
    }

    fn fill_rect(&self, x: f32, top: f32, width: f32, height: f32, fill: Rgb8) {
        let layer = self.layer();
        layer.set_fill_color(color(fill));
        layer.add_rect(Rect::new(
            Mm(x),
            y(top + height),
            Mm(x + width),
            y(top),
        ));
    }

    fn draw_header(&self, layout: &ReportLayout) {
        // page border
        self.line(
            vec![
                point(5.0, 5.0),
                point(205.0, 5.0),
                point(205.0, 292.0),
                point(5.0, 292.0),
            ],
            true,
            BLACK,
        );

        self.text(MASTHEAD, 28.0, LEFT, 25.0, BRAND_PURPLE, false);
        self.text(TAGLINE, 10.0, LEFT, 32.0, TAGLINE_GREY, false);
        self.line(vec![point(LEFT, 35.0), point(100.0, 35.0)], false, BRAND_PURPLE);

        let layer = self.layer();
        layer.set_fill_color(color(BRAND_PURPLE));
        layer.begin_text_section();
        layer.set_font(&self.font, 16.0);
        layer.set_text_matrix(TextMatrix::TranslateRotate(
            Pt::from(Mm(200.0)),
            Pt::from(y(40.0)),
            90.0,
        ));
        layer.write_text(SIDE_MARKER, &self.font);
        layer.end_text_section();

        let mut top = 45.0;
        for (label, value) in &layout.details {
            self.text(label, 10.0, LEFT, top, BLACK, false);
            self.text(&format!(": {value}"), 10.0, VALUES_X, top, BLACK, false);
            top += 6.0;
        }
        self.text(&layout.collected, 10.0, DATES_X, 63.0, BLACK, false);
        self.text(&layout.reported, 10.0, DATES_X, 69.0, BLACK, false);

        self.line(vec![point(LEFT, 75.0), point(190.0, 75.0)], false, BRAND_PURPLE);
        self.text(&layout.heading, 14.0, LEFT, 85.0, BLACK, true);
    }

    /// Returns the top-down position just below the last summary line, on the current page.
    fn draw_summary(&mut self, layout: &ReportLayout) -> f32 {
        let mut top = SUMMARY_TOP;
        for line in &layout.summary_lines {
            if overflows(top, SUMMARY_LINE_HEIGHT) {
                self.new_page();
                top = TABLE_TOP_CONTINUED;
            }
            self.text(line, 10.0, LEFT, top, BLACK, false);
            top += SUMMARY_LINE_HEIGHT;
        }
        top
    }

    fn draw_row(
        &self,
        cells: [&str; 4],
        top: f32,
        fills: [Option<Rgb8>; 4],
        texts: [Rgb8; 4],
        bold: bool,
    ) {
        let mut x = LEFT;
        for (i, cell) in cells.iter().enumerate() {
            let width = COLUMN_WIDTHS[i];
            if let Some(fill) = fills[i] {
                self.fill_rect(x, top, width, ROW_HEIGHT, fill);
            }
            self.text(cell, 8.0, x + CELL_PADDING, top + ROW_HEIGHT - 2.5, texts[i], bold);
            x += width;
        }
        let right = LEFT + COLUMN_WIDTHS.iter().sum::<f32>();
        self.line(
            vec![point(LEFT, top + ROW_HEIGHT), point(right, top + ROW_HEIGHT)],
            false,
            Rgb8(200, 200, 200),
        );
    }

    fn draw_table_header(&self, top: f32) {
        self.draw_row(
            TABLE_HEADINGS,
            top,
            [Some(BRAND_PURPLE); 4],
            [WHITE; 4],
            true,
        );
    }

    fn draw_table(&mut self, layout: &ReportLayout, start: f32) {
        let mut top = start;
        // header and first row stay together
        if overflows(top, 2.0 * ROW_HEIGHT) {
            self.new_page();
            top = TABLE_TOP_CONTINUED;
        }
        self.draw_table_header(top);
        top += ROW_HEIGHT;

        for (index, row) in layout.rows.iter().enumerate() {
            if overflows(top, ROW_HEIGHT) {
                self.new_page();
                top = TABLE_TOP_CONTINUED;
                self.draw_table_header(top);
                top += ROW_HEIGHT;
            }

            let base = (index % 2 == 1).then_some(ALTERNATE_ROW);
            self.draw_row(
                [
                    row.test.as_str(),
                    row.value.as_str(),
                    row.range.as_str(),
                    row.status.label(),
                ],
                top,
                [base, base, base, Some(row.status.fill())],
                [BLACK, BLACK, BLACK, row.status.text()],
                false,
            );
            top += ROW_HEIGHT;
        }
    }

    fn draw_footers(&self) {
        for layer in &self.layers {
            layer.set_fill_color(color(FOOTER_GREY));
            layer.use_text(FOOTER, 8.0, Mm(LEFT), y(PAGE_HEIGHT - 10.0), &self.font);
        }
    }
}
