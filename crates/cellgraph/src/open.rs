//! Workbook file loading

use std::path::Path;

use cellgraph_core::CellRecord;

use crate::error::{ServiceError, ServiceResult};

/// Reader options per file format
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    #[cfg(feature = "xlsx")]
    pub xlsx: cellgraph_xlsx::XlsxReadOptions,
    #[cfg(feature = "csv")]
    pub csv: cellgraph_csv::CsvReadOptions,
}

/// Read every cell of the workbook at `path`, picking the reader by extension
///
/// `xlsx` and `xlsm` go through the XLSX reader, `csv` through the CSV reader.
#[cfg_attr(not(any(feature = "xlsx", feature = "csv")), allow(unused_variables))]
pub fn open_workbook<P: AsRef<Path>>(
    path: P,
    options: &OpenOptions,
) -> ServiceResult<Vec<CellRecord>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        #[cfg(feature = "xlsx")]
        Some("xlsx") | Some("xlsm") => {
            Ok(cellgraph_xlsx::XlsxReader::read_file(path, &options.xlsx)?)
        }
        #[cfg(feature = "csv")]
        Some("csv") => Ok(cellgraph_csv::CsvReader::read_file(path, &options.csv)?),
        _ => Err(ServiceError::UnsupportedFormat(path.display().to_string())),
    }
}
