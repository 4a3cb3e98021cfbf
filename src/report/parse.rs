use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Loosely-typed parsed cells
// ---------------------------------------------------------------------------

/// One parsed cell before cleaning. CSV cells are always `Text`; spreadsheet
/// cells keep numeric typing where the workbook had it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

/// Format-agnostic boundary between file parsing and column normalization:
/// ordered headers plus rows of loosely-typed cells. Every row is padded to
/// header width so positional access never goes out of bounds.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// File-kind detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

/// The extension picks the reader, nothing else — parsing is content-driven
/// from here on.
pub fn detect_file_kind(filename: &str) -> Result<FileKind> {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "csv" => Ok(FileKind::Csv),
        "xlsx" | "xls" => Ok(FileKind::Xlsx),
        other => Err(AppError::UnsupportedFileType(other.to_string())),
    }
}

pub fn parse_bytes(content: &[u8], filename: &str) -> Result<RawTable> {
    match detect_file_kind(filename)? {
        FileKind::Csv => parse_csv(content),
        FileKind::Xlsx => parse_xlsx(content),
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

fn parse_csv(content: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(content);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::ParseFailure(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::ParseFailure(e.to_string()))?;
        let mut cells: Vec<CellValue> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(field.to_string())
                }
            })
            .collect();
        cells.resize(headers.len(), CellValue::Empty);
        rows.push(cells);
    }
    Ok(RawTable { headers, rows })
}

fn parse_xlsx(content: &[u8]) -> Result<RawTable> {
    let cursor = Cursor::new(content.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| AppError::ParseFailure(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseFailure("workbook has no sheets".to_string()))?
        .map_err(|e| AppError::ParseFailure(e.to_string()))?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = match row_iter.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => return Err(AppError::ParseFailure("workbook sheet is empty".to_string())),
    };

    let mut rows = Vec::new();
    for row in row_iter {
        let mut cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
        cells.resize(headers.len(), CellValue::Empty);
        rows.push(cells);
    }
    Ok(RawTable { headers, rows })
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        // Native datetime cells surface as ISO date text; the cleaner's
        // date parser picks them up from there.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Text(naive.date().to_string()),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

fn cell_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
