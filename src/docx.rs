use std::fmt::Write as _;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Error;
use crate::model::{Document, Section, pts_to_twips};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

// 1 inch on every side.
const MARGIN_TWIPS: u32 = 1440;

const APPLICATION: &str = "pdf2docx";

pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escapes markup and drops characters XML 1.0 cannot carry.
fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

fn content_types() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
        r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
        r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
        r#"</Types>"#,
    )
    .to_string()
}

fn package_rels() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
            r#"</Relationships>"#,
        ),
        ns = PKG_REL_NS
    )
}

fn document_rels() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            r#"</Relationships>"#,
        ),
        ns = PKG_REL_NS
    )
}

fn styles() -> String {
    // Calibri 11pt, 8pt after, line 259/240 (1.08)
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:styles xmlns:w="{w}">"#,
            r#"<w:docDefaults>"#,
            r#"<w:rPrDefault><w:rPr>"#,
            r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/>"#,
            r#"<w:sz w:val="22"/><w:szCs w:val="22"/>"#,
            r#"</w:rPr></w:rPrDefault>"#,
            r#"<w:pPrDefault><w:pPr>"#,
            r#"<w:spacing w:after="160" w:line="259" w:lineRule="auto"/>"#,
            r#"</w:pPr></w:pPrDefault>"#,
            r#"</w:docDefaults>"#,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">"#,
            r#"<w:name w:val="Normal"/><w:qFormat/>"#,
            r#"</w:style>"#,
            r#"</w:styles>"#,
        ),
        w = WML_NS
    )
}

fn core_properties(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<cp:coreProperties"#,
            r#" xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
            r#" xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
            r#"<dc:title>{title}</dc:title>"#,
            r#"<dc:creator>{app}</dc:creator>"#,
            r#"</cp:coreProperties>"#,
        ),
        title = xml_escape(title),
        app = APPLICATION
    )
}

fn app_properties(pages: usize) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            r#"<Application>{app}</Application>"#,
            r#"<Pages>{pages}</Pages>"#,
            r#"</Properties>"#,
        ),
        app = APPLICATION,
        pages = pages
    )
}

fn section_properties(out: &mut String, section: &Section) {
    let w = pts_to_twips(section.width);
    let h = pts_to_twips(section.height);
    out.push_str("<w:sectPr>");
    if w > h {
        let _ = write!(out, r#"<w:pgSz w:w="{w}" w:h="{h}" w:orient="landscape"/>"#);
    } else {
        let _ = write!(out, r#"<w:pgSz w:w="{w}" w:h="{h}"/>"#);
    }
    let _ = write!(
        out,
        r#"<w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="720" w:footer="720" w:gutter="0"/>"#,
        m = MARGIN_TWIPS
    );
    out.push_str("</w:sectPr>");
}

fn paragraph(out: &mut String, text: &str) {
    let _ = write!(
        out,
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        xml_escape(text)
    );
}

fn document_xml(doc: &Document) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{WML_NS}" xmlns:r="{REL_NS}"><w:body>"#
    );

    let last_section = doc.sections.len().saturating_sub(1);
    for (si, section) in doc.sections.iter().enumerate() {
        for (pi, page) in section.pages.iter().enumerate() {
            if pi > 0 {
                out.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
            }
            if page.paragraphs.is_empty() {
                out.push_str("<w:p/>");
            }
            for para in &page.paragraphs {
                paragraph(&mut out, &para.text);
            }
        }
        // A non-final section ends with a paragraph carrying its sectPr;
        // the final one goes directly under w:body.
        if si < last_section {
            out.push_str("<w:p><w:pPr>");
            section_properties(&mut out, section);
            out.push_str("</w:pPr></w:p>");
        } else {
            section_properties(&mut out, section);
        }
    }

    out.push_str("</w:body></w:document>");
    out
}

/// Renders the document as a complete DOCX package.
pub fn render(doc: &Document) -> Result<Vec<u8>, Error> {
    if doc.sections.is_empty() {
        return Err(Error::InvalidPdf("nothing to convert".into()));
    }

    let parts = [
        ("[Content_Types].xml", content_types()),
        ("_rels/.rels", package_rels()),
        ("word/document.xml", document_xml(doc)),
        ("word/styles.xml", styles()),
        ("word/_rels/document.xml.rels", document_rels()),
        ("docProps/core.xml", core_properties(&doc.title)),
        ("docProps/app.xml", app_properties(doc.page_count())),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, xml) in parts {
        zip.start_file(name, options)?;
        zip.write_all(xml.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
