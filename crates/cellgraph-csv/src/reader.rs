//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;
use cellgraph_core::{CellAddress, CellRecord, MAX_COLS, MAX_ROWS};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read the cells of a CSV file
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        options: &CsvReadOptions,
    ) -> CsvResult<Vec<CellRecord>> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read the cells of CSV data
    ///
    /// Every row, the first included, is data. Rows may differ in length;
    /// empty fields become cells without content.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Vec<CellRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();

        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;

            for (column, field) in record.iter().enumerate() {
                if row >= MAX_ROWS as usize || column >= MAX_COLS as usize {
                    return Err(CsvError::OutOfBounds { row, column });
                }

                let coordinate = CellAddress::new(row as u32, column as u16).to_a1_string();
                let raw = (!field.is_empty()).then(|| field.to_string());
                records.push(CellRecord::new(
                    options.sheet_name.as_str(),
                    coordinate,
                    raw,
                ));
            }
        }

        Ok(records)
    }
}
