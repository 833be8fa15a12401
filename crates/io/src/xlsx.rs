// Excel row extraction (xlsx, xls, xlsb, ods) via calamine
//
// Only the first sheet is read. Typed date cells are rendered as dd.mm.yyyy
// text so they age the same way as dates typed in by hand.

use std::collections::HashMap;
use std::path::Path;

use agingboard_aging::{CellValue, RawRow};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;

use crate::error::IoError;
use crate::ExtractedSheet;

/// Maximum rows read from a sheet (header included)
const MAX_ROWS: usize = 1_048_576;

pub fn read_first_sheet(path: &Path) -> Result<ExtractedSheet, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(IoError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::Sheet {
            sheet: sheet_name.clone(),
            message: e.to_string(),
        })?;

    let mut rows_iter = range.rows().take(MAX_ROWS);
    let headers: Vec<String> = match rows_iter.next() {
        Some(first) => first
            .iter()
            .map(|cell| cell_value(cell).as_text().unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::new();
    for row in rows_iter {
        let cells: HashMap<String, CellValue> = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell_value(cell)))
            .collect();
        let row = RawRow::new(cells);
        if !row.is_blank() {
            rows.push(row);
        }
    }

    if range.height() > MAX_ROWS {
        tracing::warn!(sheet = %sheet_name, height = range.height(), limit = MAX_ROWS, "sheet truncated");
    }

    Ok(ExtractedSheet {
        sheet: sheet_name,
        headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
        rows,
    })
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => match serial_to_date(dt.as_f64()) {
            Some(date) => CellValue::Text(dotted(date)),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d") {
            Ok(date) => CellValue::Text(dotted(date)),
            Err(_) => CellValue::from(s.as_str()),
        },
        Data::DurationIso(s) => CellValue::from(s.as_str()),
    }
}

/// Excel 1900 date system. Day 0 is 1899-12-30 (absorbs the 1900 leap-year bug
/// for every date after February 1900).
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}

fn dotted(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
