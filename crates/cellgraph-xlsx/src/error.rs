//! XLSX reader errors

use thiserror::Error;

/// Result type for XLSX reading
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Why a workbook could not be read
///
/// Problems confined to a single cell (an unparseable `r` attribute, an
/// unknown shared formula index) are logged and skipped instead.
#[derive(Debug, Error)]
pub enum XlsxError {
    /// The file could not be opened or read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable ZIP archive
    #[error("Not a ZIP archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A part is not well-formed XML
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is not an Office Open XML package
    #[error("Not an XLSX package: {0}")]
    NotXlsx(String),

    /// A part the workbook points to is absent
    #[error("Workbook part '{0}' is missing")]
    MissingPart(String),

    /// A cell names a shared string that does not exist
    #[error("Bad shared string reference: {0}")]
    BadSharedString(String),
}
