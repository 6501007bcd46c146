#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::Path;

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub struct FixturePage<'a> {
    /// `None` leaves the MediaBox out entirely.
    pub size: Option<(f32, f32)>,
    pub lines: &'a [&'a str],
}

pub fn letter<'a>(lines: &'a [&'a str]) -> FixturePage<'a> {
    FixturePage {
        size: Some((612.0, 792.0)),
        lines,
    }
}

pub fn a4<'a>(lines: &'a [&'a str]) -> FixturePage<'a> {
    FixturePage {
        size: Some((595.0, 842.0)),
        lines,
    }
}

pub fn unsized_page<'a>(lines: &'a [&'a str]) -> FixturePage<'a> {
    FixturePage { size: None, lines }
}

/// Writes a PDF with one Helvetica text line per entry, top to bottom.
pub fn write_pdf(path: &Path, pages: &[FixturePage]) {
    write_pdf_with_font(path, pages, "Helvetica");
}

/// Like [`write_pdf`], but with a Type1 font of the given name and no
/// `/Widths`, so non-core names make the extractor print diagnostics.
pub fn write_pdf_with_font(path: &Path, pages: &[FixturePage], base_font: &str) {
    let mut pdf = Pdf::new();

    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let font_id = Ref::new(3);
    let page_ids: Vec<Ref> = (0..pages.len()).map(|i| Ref::new(4 + 2 * i as i32)).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(pages.len() as i32);

    for (page, &page_id) in pages.iter().zip(&page_ids) {
        let content_id = Ref::new(page_id.get() + 1);

        let mut content = Content::new();
        let height = page.size.map_or(792.0, |(_, h)| h);
        let mut cursor_y = height - 72.0;
        for line in page.lines {
            content
                .begin_text()
                .set_font(Name(b"F1"), 12.0)
                .next_line(72.0, cursor_y)
                .show(Str(line.as_bytes()))
                .end_text();
            cursor_y -= 12.0 * 1.2;
        }
        pdf.stream(content_id, &content.finish());

        let mut page_writer = pdf.page(page_id);
        if let Some((width, height)) = page.size {
            page_writer.media_box(Rect::new(0.0, 0.0, width, height));
        }
        page_writer
            .parent(pages_id)
            .contents(content_id)
            .resources()
            .fonts()
            .pair(Name(b"F1"), font_id);
    }

    pdf.type1_font(font_id)
        .base_font(Name(base_font.as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    fs::write(path, pdf.finish()).unwrap();
}

pub fn read_part(docx: &Path, name: &str) -> String {
    let file = fs::File::open(docx).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut xml = String::new();
    zip.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
    xml
}

/// Concatenated `w:t` text of each body paragraph, empty paragraphs skipped.
pub fn docx_paragraphs(docx: &Path) -> Vec<String> {
    let xml = read_part(docx, "word/document.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    doc.descendants()
        .filter(|n| n.tag_name().name() == "p" && n.tag_name().namespace() == Some(WML_NS))
        .map(|p| {
            p.descendants()
                .filter(|n| n.tag_name().name() == "t" && n.tag_name().namespace() == Some(WML_NS))
                .filter_map(|n| n.text())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
        .collect()
}

/// `(w:w, w:h)` of every section in document order.
pub fn section_sizes(docx: &Path) -> Vec<(u32, u32)> {
    let xml = read_part(docx, "word/document.xml");
    let doc = roxmltree::Document::parse(&xml).unwrap();
    doc.descendants()
        .filter(|n| n.tag_name().name() == "pgSz" && n.tag_name().namespace() == Some(WML_NS))
        .map(|n| {
            let w = n.attribute((WML_NS, "w")).unwrap().parse().unwrap();
            let h = n.attribute((WML_NS, "h")).unwrap().parse().unwrap();
            (w, h)
        })
        .collect()
}
