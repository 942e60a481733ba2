use std::collections::HashSet;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::tnea::cutoff::error::Result;
use crate::tnea::cutoff::model::{Cell, NOT_AVAILABLE, Table};

/// Name of the single worksheet holding the cutoff table.
pub const SHEET_NAME: &str = "Cutoffs";

/// Writes the table to an xlsx workbook: a header row of display names, one
/// row per record, numbers as numeric cells and nulls as `N/A`.
pub fn write_workbook(path: &Path, table: &Table) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let headers = table_headers(table.headers());
    for (col_idx, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, header)?;
    }

    for (row_idx, record) in table.records.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col_idx, cell) in table.row(record).iter().enumerate() {
            write_cell(worksheet, row, col_idx as u16, cell)?;
        }
    }

    let mut excel_table = rust_xlsxwriter::Table::new();
    excel_table.set_autofilter(true);
    let col_end = (headers.len() as u16).saturating_sub(1);
    // An Excel table needs at least one data row.
    let row_end = table.len().max(1) as u32;
    worksheet.add_table(0, 0, row_end, col_end, &excel_table)?;

    workbook.save(path)?;
    Ok(())
}

/// Excel tables reject header names that repeat ignoring case, so later
/// duplicates get a ` (2)`, ` (3)`, ... suffix. Blank names become `Column N`.
fn table_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(idx, header)| {
            let base = if header.trim().is_empty() {
                format!("Column {}", idx + 1)
            } else {
                header
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !seen.insert(candidate.to_lowercase()) {
                candidate = format!("{base} ({suffix})");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &Cell<'_>) -> Result<()> {
    match cell {
        Cell::Cutoff(value) => {
            worksheet.write_number(row, col, *value)?;
        }
        Cell::Seats(value) => {
            worksheet.write_number(row, col, *value as f64)?;
        }
        other if other.is_null() => {
            worksheet.write_string(row, col, NOT_AVAILABLE)?;
        }
        other => {
            worksheet.write_string(row, col, other.render(NOT_AVAILABLE))?;
        }
    }
    Ok(())
}
