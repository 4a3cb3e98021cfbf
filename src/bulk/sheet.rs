//! Fixed-layout tabular output. Column order is part of the downstream
//! platform contract: it never varies across rows and is never reordered.

use rust_xlsxwriter::Workbook;

use crate::error::Result;

/// One sheet: a header row plus rendered string rows. Every row must carry
/// exactly one cell per column; irrelevant fields are empty strings, never
/// omitted, so positional alignment holds.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An ordered collection of sheets serialized to an in-memory XLSX buffer.
#[derive(Debug, Clone, Default)]
pub struct BulkDocument {
    pub sheets: Vec<Sheet>,
}

impl BulkDocument {
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet.name)?;
            for (col, header) in sheet.columns.iter().enumerate() {
                worksheet.write_string(0, col as u16, *header)?;
            }
            for (row_idx, row) in sheet.rows.iter().enumerate() {
                for (col, cell) in row.iter().enumerate() {
                    if !cell.is_empty() {
                        worksheet.write_string((row_idx + 1) as u32, col as u16, cell.as_str())?;
                    }
                }
            }
        }
        Ok(workbook.save_to_buffer()?)
    }
}

/// Single-sheet CSV rendering for callers that want a flat file instead of
/// a workbook.
pub fn sheet_to_csv_bytes(sheet: &Sheet) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(sheet.columns)?;
        for row in &sheet.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

/// Canonical decimal rendering for money cells: 25.0 → "25", 0.75 → "0.75".
/// The platform parses bulksheet cells as text, so trailing zeros only add
/// noise.
pub fn money(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
