use crate::models::Listing;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub const REPORT_TITLE: &str = "Weekly Real Estate Report";

// US letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

const MARGIN_X: f32 = 50.0;
const LINE_STEP: f32 = 15.0;
const RECORD_GAP: f32 = 25.0;
// Start a fresh page once the cursor drops below this
const BOTTOM_MARGIN: f32 = 100.0;

/// One positioned text run, in PDF point coordinates (origin bottom-left)
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

impl TextLine {
    fn new(text: impl Into<String>, x: f32, y: f32, size: f32, bold: bool) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            bold,
        }
    }
}

/// Place the title, date and listing lines onto pages.
///
/// Pure layout: rendering consumes the result verbatim, and tests assert on
/// it without decoding a PDF. Records are placed in input order; a record
/// always finishes on the page it started on, and a new page begins once the
/// cursor falls under the bottom margin.
pub fn layout(listings: &[Listing], generated_at: DateTime<Local>) -> Vec<Vec<TextLine>> {
    let mut pages = Vec::new();
    let mut page = vec![
        TextLine::new(REPORT_TITLE, MARGIN_X, PAGE_HEIGHT - 50.0, 16.0, true),
        TextLine::new(
            format!("Date: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
            MARGIN_X,
            PAGE_HEIGHT - 70.0,
            12.0,
            false,
        ),
    ];
    let mut y = PAGE_HEIGHT - 100.0;

    for (idx, listing) in listings.iter().enumerate() {
        page.push(TextLine::new(
            format!("Address: {}", listing.address),
            MARGIN_X,
            y,
            12.0,
            true,
        ));
        y -= LINE_STEP;

        let detail_lines = [
            format!("Price: {}", listing.price),
            format!("Beds: {}", listing.beds),
            format!("Baths: {}", listing.baths),
            format!("SqFt: {}", listing.sqft),
            format!("Link: {}", listing.link),
        ];
        for line in detail_lines {
            page.push(TextLine::new(line, MARGIN_X, y, 12.0, false));
            y -= LINE_STEP;
        }
        // Extra space between listings
        y -= RECORD_GAP - LINE_STEP;

        let more_to_place = idx + 1 < listings.len();
        if y < BOTTOM_MARGIN && more_to_place {
            pages.push(std::mem::take(&mut page));
            y = PAGE_HEIGHT - 50.0;
        }
    }

    pages.push(page);
    pages
}

/// Render the listings into a PDF at `path`
pub fn write_report(listings: &[Listing], path: &Path) -> Result<()> {
    render(&layout(listings, Local::now()), path)
}

fn render(pages: &[Vec<TextLine>], path: &Path) -> Result<()> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm::from(Pt(PAGE_WIDTH)),
        Mm::from(Pt(PAGE_HEIGHT)),
        "Layer 1",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .context("Failed to load Helvetica")?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .context("Failed to load Helvetica-Bold")?;

    for (idx, lines) in pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) =
                doc.add_page(Mm::from(Pt(PAGE_WIDTH)), Mm::from(Pt(PAGE_HEIGHT)), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        for line in lines {
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(
                line.text.clone(),
                line.size,
                Mm::from(Pt(line.x)),
                Mm::from(Pt(line.y)),
                font,
            );
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))
        .context("Failed to write PDF")?;

    Ok(())
}
