mod converter;
mod docx;
mod error;
mod model;
mod pdf;

pub use converter::Converter;
pub use error::Error;

use std::path::Path;

/// Converts every page of `input` into a DOCX written to `output`.
pub fn convert_pdf_to_docx(input: &Path, output: &Path) -> Result<(), Error> {
    let converter = Converter::open(input)?;
    converter.convert(output, 0, None)?;
    converter.close();
    Ok(())
}
