use std::panic::{self, AssertUnwindSafe};

use gag::Gag;
use lopdf::{Dictionary, Object, ObjectId};

use crate::docx::is_xml_char;
use crate::error::Error;
use crate::model::{Page, Paragraph};

const LETTER_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

// Page trees deeper than this are treated as malformed.
const MAX_TREE_DEPTH: usize = 32;

pub struct PdfSource {
    pub bytes: Vec<u8>,
    pub page_sizes: Vec<(f32, f32)>,
}

/// Parses the document and records each page's size.
///
/// Pages without a usable MediaBox of their own get the inherited one (or
/// US Letter) written onto them, and the document is re-serialized, since
/// the text extractor requires one on every page.
pub fn load(bytes: Vec<u8>) -> Result<PdfSource, Error> {
    let mut doc = lopdf::Document::load_mem(&bytes)?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(Error::InvalidPdf("document has no pages".into()));
    }

    let mut page_sizes = Vec::with_capacity(pages.len());
    let mut missing = Vec::new();
    for &id in pages.values() {
        let rect = inherited_media_box(&doc, id).unwrap_or(LETTER_BOX);
        page_sizes.push(oriented_size(rect, rotation(&doc, id)));
        let has_own = doc
            .get_dictionary(id)
            .ok()
            .and_then(|page| media_box(&doc, page))
            .is_some();
        if !has_own {
            missing.push((id, rect));
        }
    }

    if missing.is_empty() {
        return Ok(PdfSource { bytes, page_sizes });
    }
    log::debug!("setting MediaBox on {} page(s)", missing.len());
    for (id, rect) in missing {
        let page = doc.get_object_mut(id)?.as_dict_mut()?;
        page.set(
            "MediaBox",
            Object::Array(rect.iter().map(|&v| Object::Real(v.into())).collect()),
        );
    }
    let mut patched = Vec::new();
    doc.save_to(&mut patched)?;
    Ok(PdfSource {
        bytes: patched,
        page_sizes,
    })
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// The dictionary's own MediaBox, if it is a rectangle with non-zero area.
fn media_box(doc: &lopdf::Document, dict: &Dictionary) -> Option<[f32; 4]> {
    let obj = resolve(doc, dict.get(b"MediaBox").ok()?)?;
    let coords: Vec<f32> = obj
        .as_array()
        .ok()?
        .iter()
        .filter_map(|o| resolve(doc, o).and_then(number))
        .collect();
    let rect: [f32; 4] = coords.try_into().ok()?;
    let [x0, y0, x1, y1] = rect;
    (x1 != x0 && y1 != y0).then_some(rect)
}

/// MediaBox of the page, following `/Parent` when it is inherited.
fn inherited_media_box(doc: &lopdf::Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Some(rect) = media_box(doc, dict) {
            return Some(rect);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn rotation(doc: &lopdf::Document, page_id: ObjectId) -> i64 {
    doc.get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Rotate").ok())
        .and_then(|o| resolve(doc, o))
        .and_then(number)
        .map(|r| (r as i64).rem_euclid(360))
        .unwrap_or(0)
}

/// A `/Rotate` of 90 or 270 swaps the dimensions.
fn oriented_size([x0, y0, x1, y1]: [f32; 4], rotate: i64) -> (f32, f32) {
    let (width, height) = ((x1 - x0).abs(), (y1 - y0).abs());
    if rotate == 90 || rotate == 270 {
        (height, width)
    } else {
        (width, height)
    }
}

/// Runs `f`, turning a panic into an extraction error without letting the
/// panic hook print to stderr.
fn catch_extractor_panic<T>(f: impl FnOnce() -> T) -> Result<T, Error> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(hook);

    result.map_err(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "extractor panicked".to_string());
        Error::Extract(msg)
    })
}

/// Extracts text for every page.
///
/// The extractor prints diagnostics straight to stdout and stderr, so both
/// are silenced for the duration of the call.
pub fn extract_pages(bytes: &[u8], expected: usize) -> Result<Vec<String>, Error> {
    let pages = {
        let _gag_out = Gag::stdout().ok();
        let _gag_err = Gag::stderr().ok();
        catch_extractor_panic(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
    }??;
    // The extractor stops quietly at the first page it cannot read.
    if pages.len() != expected {
        return Err(Error::Extract(format!(
            "got text for {} of {expected} page(s)",
            pages.len()
        )));
    }
    Ok(pages)
}

/// Splits extracted page text into paragraphs. Blank lines separate
/// paragraphs; wrapped lines are joined with a single space.
pub fn layout_paragraphs(text: &str) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let mut words = line
            .split(char::is_whitespace)
            .filter(|w| !w.is_empty())
            .peekable();
        if words.peek().is_none() {
            if !current.is_empty() {
                paragraphs.push(Paragraph {
                    text: std::mem::take(&mut current),
                });
            }
            continue;
        }
        for word in words {
            let word: String = word.chars().filter(|&c| is_xml_char(c)).collect();
            if word.is_empty() {
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
    }
    if !current.is_empty() {
        paragraphs.push(Paragraph { text: current });
    }
    paragraphs
}

pub fn build_page(text: &str, (width, height): (f32, f32)) -> Page {
    Page {
        width,
        height,
        paragraphs: layout_paragraphs(text),
    }
}
