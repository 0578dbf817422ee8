//! XLSX reader

mod shared_formula;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::options::XlsxReadOptions;
use cellgraph_core::record::FORMULA_PREFIX;
use cellgraph_core::{CellAddress, CellRecord};
use shared_formula::SharedFormulas;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }

        let mut hex_chars = String::new();
        let mut consumed_x = false;
        let mut is_escape = false;

        if chars.peek() == Some(&'x') {
            chars.next();
            consumed_x = true;

            for _ in 0..4 {
                match chars.peek() {
                    Some(&ch) if ch.is_ascii_hexdigit() => {
                        hex_chars.push(ch);
                        chars.next();
                    }
                    _ => break,
                }
            }

            if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
                if let Some(decoded) =
                    u32::from_str_radix(&hex_chars, 16).ok().and_then(char::from_u32)
                {
                    chars.next();
                    result.push(decoded);
                    is_escape = true;
                }
            }
        }

        if !is_escape {
            // Not a valid escape sequence, output what we consumed
            result.push('_');
            if consumed_x {
                result.push('x');
            }
            result.push_str(&hex_chars);
        }
    }

    result
}

/// Attribute value by key, unescaped
fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// The `<f>` element of the cell being read
#[derive(Debug, Default)]
struct FormulaElement {
    text: Option<String>,
    shared_index: Option<String>,
}

impl FormulaElement {
    fn from_start(e: &BytesStart) -> Self {
        let shared = attr_value(e, b"t").as_deref() == Some("shared");
        Self {
            text: None,
            shared_index: if shared { attr_value(e, b"si") } else { None },
        }
    }
}

/// Destination of text events inside a `<c>` element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    Ignored,
    Value,
    Formula,
    InlineString,
}

/// The `<c>` element being read
#[derive(Debug, Default)]
struct PendingCell {
    reference: Option<String>,
    kind: Option<String>,
    value: Option<String>,
    formula: Option<FormulaElement>,
    in_phonetic: bool,
}

impl PendingCell {
    fn from_start(e: &BytesStart) -> Self {
        Self {
            reference: attr_value(e, b"r"),
            kind: attr_value(e, b"t"),
            ..Self::default()
        }
    }

    /// Record a child element and report where its text goes
    fn open_child(&mut self, e: &BytesStart, empty: bool) -> TextTarget {
        match e.name().as_ref() {
            b"f" => {
                self.formula = Some(FormulaElement::from_start(e));
                TextTarget::Formula
            }
            b"v" if !empty => TextTarget::Value,
            b"rPh" if !empty => {
                self.in_phonetic = true;
                TextTarget::Ignored
            }
            // Rich inline strings split their text over several <t> runs
            b"t" if !empty
                && !self.in_phonetic
                && self.kind.as_deref() == Some("inlineStr") =>
            {
                TextTarget::InlineString
            }
            _ => TextTarget::Ignored,
        }
    }

    fn push_text(&mut self, target: TextTarget, text: String) {
        match target {
            TextTarget::Value => self.value = Some(text),
            TextTarget::Formula => {
                if let Some(formula) = self.formula.as_mut() {
                    formula.text = Some(text);
                }
            }
            TextTarget::InlineString => {
                self.value.get_or_insert_with(String::new).push_str(&text);
            }
            TextTarget::Ignored => {}
        }
    }
}

/// Decoded cells of one worksheet plus the state needed to decode them
struct SheetCells<'a> {
    sheet_name: &'a str,
    shared_strings: &'a [String],
    shared_formulas: SharedFormulas,
    cells: Vec<(CellAddress, CellRecord)>,
}

impl<'a> SheetCells<'a> {
    fn new(sheet_name: &'a str, shared_strings: &'a [String]) -> Self {
        Self {
            sheet_name,
            shared_strings,
            shared_formulas: SharedFormulas::default(),
            cells: Vec::new(),
        }
    }

    /// Turn a finished `<c>` element into a record
    ///
    /// Cells whose reference does not parse are skipped with a warning.
    fn finish_cell(&mut self, cell: PendingCell) -> XlsxResult<()> {
        let Some(reference) = cell.reference else {
            return Ok(());
        };
        let addr = match CellAddress::parse(&reference) {
            Ok(addr) => addr,
            Err(e) => {
                log::warn!("Skipping cell on sheet '{}': {e}", self.sheet_name);
                return Ok(());
            }
        };

        let raw = match self.formula_text(&reference, addr, cell.formula) {
            Some(text) if text.starts_with(FORMULA_PREFIX) => Some(text),
            Some(text) => Some(format!("{FORMULA_PREFIX}{text}")),
            None => resolve_value(cell.kind.as_deref(), cell.value, self.shared_strings)?,
        };

        self.cells
            .push((addr, CellRecord::new(self.sheet_name, reference, raw)));
        Ok(())
    }

    /// Formula text of a cell, expanding shared-formula followers
    fn formula_text(
        &mut self,
        reference: &str,
        addr: CellAddress,
        formula: Option<FormulaElement>,
    ) -> Option<String> {
        let FormulaElement { text, shared_index } = formula?;
        match (text, shared_index) {
            (Some(text), Some(index)) => {
                self.shared_formulas.insert(&index, addr, &text);
                Some(text)
            }
            (Some(text), None) => Some(text),
            (None, Some(index)) => {
                let expanded = self.shared_formulas.expand(&index, addr);
                if expanded.is_none() {
                    log::warn!("Cell '{reference}' uses unknown shared formula {index}");
                }
                expanded
            }
            (None, None) => None,
        }
    }
}

/// Raw text of a literal value, by cell type
fn resolve_value(
    kind: Option<&str>,
    value: Option<String>,
    shared_strings: &[String],
) -> XlsxResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let text = match kind {
        Some("s") => {
            let found = value
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index));
            found.cloned().ok_or(XlsxError::BadSharedString(value))?
        }
        Some("b") if value == "1" || value.eq_ignore_ascii_case("true") => "TRUE".to_string(),
        Some("b") => "FALSE".to_string(),
        Some("inlineStr") | Some("str") => decode_excel_escapes(&value),
        // Numbers and error codes keep their stored text
        _ => value,
    };

    Ok(Some(text))
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read the cells of a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(
        path: P,
        options: &XlsxReadOptions,
    ) -> XlsxResult<Vec<CellRecord>> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read the cells of a workbook from a reader
    ///
    /// Sheets are visited in workbook order. Within a sheet, cells come in
    /// document order, or row by row over the used range when
    /// [`XlsxReadOptions::fill_used_range`] is set.
    pub fn read<R: Read + Seek>(
        reader: R,
        options: &XlsxReadOptions,
    ) -> XlsxResult<Vec<CellRecord>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::NotXlsx(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let sheet_info = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut records = Vec::new();
        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                log::warn!("Sheet '{name}' has no worksheet part for {r_id}, skipping");
                continue;
            };

            let cells = Self::read_worksheet(&mut archive, path, name, &shared_strings)?;
            if options.fill_used_range {
                records.extend(Self::fill_used_range(name, cells, options.max_filled_cells));
            } else {
                records.extend(cells.into_iter().map(|(_, record)| record));
            }
        }

        log::debug!(
            "Read {} cells from {} sheets",
            records.len(),
            sheet_info.len()
        );

        Ok(records)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs carry their own <t> elements
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" if in_si => {
                        in_phonetic = true;
                    }
                    b"t" if in_si && !in_phonetic => {
                        in_t = true;
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"t" => {
                        in_t = false;
                    }
                    b"rPh" => {
                        in_phonetic = false;
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    if let Ok(text) = e.unescape() {
                        current_string.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    if let (Some(name), Some(r_id)) =
                        (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                    {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    let rel_type = attr_value(&e, b"Type");

                    // Only include worksheet relationships
                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            // Target is relative to xl/ folder
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Read the cells of one worksheet in document order
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        sheet_name: &str,
        shared_strings: &[String],
    ) -> XlsxResult<Vec<(CellAddress, CellRecord)>> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut sheet = SheetCells::new(sheet_name, shared_strings);
        let mut pending: Option<PendingCell> = None;
        let mut target = TextTarget::Ignored;
        let mut buf = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if e.name().as_ref() == b"c" {
                        pending = Some(PendingCell::from_start(&e));
                    } else if let Some(cell) = pending.as_mut() {
                        target = cell.open_child(&e, false);
                    }
                }
                Event::Empty(e) => {
                    if e.name().as_ref() == b"c" {
                        // Styled but empty cell
                        sheet.finish_cell(PendingCell::from_start(&e))?;
                    } else if let Some(cell) = pending.as_mut() {
                        cell.open_child(&e, true);
                    }
                }
                Event::End(e) => {
                    match e.name().as_ref() {
                        b"c" => {
                            if let Some(cell) = pending.take() {
                                sheet.finish_cell(cell)?;
                            }
                        }
                        b"rPh" => {
                            if let Some(cell) = pending.as_mut() {
                                cell.in_phonetic = false;
                            }
                        }
                        _ => {}
                    }
                    target = TextTarget::Ignored;
                }
                Event::Text(e) => {
                    if let Some(cell) = pending.as_mut() {
                        cell.push_text(target, e.unescape()?.into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet.cells)
    }

    /// Expand document-order cells to the full `A1:<max>` rectangle, row by row
    ///
    /// A sheet without stored cells still has `A1`. A rectangle larger than
    /// `max_cells` is not filled and only the stored cells are returned.
    fn fill_used_range(
        sheet_name: &str,
        cells: Vec<(CellAddress, CellRecord)>,
        max_cells: u64,
    ) -> Vec<CellRecord> {
        let max_row = cells.iter().map(|(addr, _)| addr.row).max().unwrap_or(0);
        let max_col = cells.iter().map(|(addr, _)| addr.col).max().unwrap_or(0);

        let area = (u64::from(max_row) + 1) * (u64::from(max_col) + 1);
        if area > max_cells {
            log::warn!(
                "Used range of sheet '{}' ends at {} ({} cells), reading stored cells only",
                sheet_name,
                CellAddress::new(max_row, max_col),
                area
            );
            return cells.into_iter().map(|(_, record)| record).collect();
        }

        let mut by_position: HashMap<(u32, u16), CellRecord> = cells
            .into_iter()
            .map(|(addr, record)| ((addr.row, addr.col), record))
            .collect();

        let mut records = Vec::with_capacity(area as usize);
        for row in 0..=max_row {
            for col in 0..=max_col {
                let record = by_position.remove(&(row, col)).unwrap_or_else(|| {
                    CellRecord::empty(sheet_name, CellAddress::new(row, col).to_a1_string())
                });
                records.push(record);
            }
        }

        records
    }
}
