use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidPdf(String),
    Pdf(lopdf::Error),
    Extract(String),
    PageRange {
        start: usize,
        end: usize,
        count: usize,
    },
    Zip(zip::result::ZipError),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPdf(reason) => write!(f, "not a valid PDF file: {reason}"),
            Error::Pdf(e) => write!(f, "PDF error: {e}"),
            Error::Extract(e) => write!(f, "text extraction failed: {e}"),
            Error::PageRange { start, end, count } => write!(
                f,
                "invalid page range {start}..{end} for a document with {count} page(s)"
            ),
            Error::Zip(e) => write!(f, "ZIP error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<lopdf::Error> for Error {
    fn from(e: lopdf::Error) -> Self {
        Error::Pdf(e)
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(e: pdf_extract::OutputError) -> Self {
        Error::Extract(e.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
