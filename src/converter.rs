use std::path::Path;

use crate::docx;
use crate::error::Error;
use crate::model::{self, Document};
use crate::pdf::{self, PdfSource};

/// An open PDF document, ready to be converted.
///
/// The document is held in memory until the converter is closed or dropped.
pub struct Converter {
    title: String,
    source: PdfSource,
}

impl Converter {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        let source = pdf::load(bytes)?;
        log::debug!(
            "opened {} ({} page(s))",
            path.display(),
            source.page_sizes.len()
        );
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Converter { title, source })
    }

    pub fn page_count(&self) -> usize {
        self.source.page_sizes.len()
    }

    /// Converts pages `start..end` (zero-based, `end` exclusive, `None` for
    /// the last page) and writes the DOCX to `output`.
    ///
    /// The output file is only written once the whole package has been
    /// rendered.
    pub fn convert(&self, output: &Path, start: usize, end: Option<usize>) -> Result<(), Error> {
        let count = self.page_count();
        let end = end.unwrap_or(count);
        if start >= end || end > count {
            return Err(Error::PageRange { start, end, count });
        }
        log::info!(
            "converting pages {}-{} of {} to {}",
            start + 1,
            end,
            count,
            output.display()
        );

        let texts = pdf::extract_pages(&self.source.bytes, count)?;

        let mut pages = Vec::with_capacity(end - start);
        for index in start..end {
            let page = pdf::build_page(&texts[index], self.source.page_sizes[index]);
            log::debug!("page {}: {} paragraph(s)", index + 1, page.paragraphs.len());
            pages.push(page);
        }

        let doc = Document {
            title: self.title.clone(),
            sections: model::group_sections(pages),
        };
        let bytes = docx::render(&doc)?;
        std::fs::write(output, &bytes)?;
        log::info!(
            "wrote {} ({} section(s), {} bytes)",
            output.display(),
            doc.sections.len(),
            bytes.len()
        );
        Ok(())
    }

    /// Releases the document. Dropping the converter has the same effect.
    pub fn close(self) {}
}

impl Drop for Converter {
    fn drop(&mut self) {
        log::debug!("closing converter for '{}'", self.title);
    }
}
