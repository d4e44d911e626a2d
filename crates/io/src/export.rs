//! Downloadable artifacts: the Mandae workbook and its dated file name.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::csv::Table;
use crate::error::{Error, ExportError};
use crate::layout::mandae_layout;
use crate::mandae::{map_orders, MandaeRow, OUTPUT_HEADERS};
use crate::xlsx;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv";

/// A finished output file, held in memory until the caller stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    /// Data rows in the artifact (headers excluded).
    pub rows: usize,
}

/// Tomorrow, or the following Monday when `today` is a Friday.
pub fn next_business_day(today: NaiveDate) -> NaiveDate {
    let offset = if today.weekday() == Weekday::Fri { 3 } else { 1 };
    today + Days::new(offset)
}

/// `{rows}Pedidos - {dd.mm} - L2.xlsx`, dated on the next business day.
pub fn workbook_filename(rows: usize, today: NaiveDate) -> String {
    format!(
        "{rows}Pedidos - {} - L2.xlsx",
        next_business_day(today).format("%d.%m")
    )
}

/// Render intake rows under the Mandae layout.
pub fn build_mandae_workbook(rows: &[MandaeRow]) -> Result<Vec<u8>, ExportError> {
    let layout = mandae_layout(rows.len());
    let mut grid: Vec<Vec<&str>> = Vec::with_capacity(rows.len() + 1);
    grid.push(OUTPUT_HEADERS.to_vec());
    grid.extend(rows.iter().map(|row| row.cells().to_vec()));
    xlsx::render(&layout, &grid)
}

/// The whole spreadsheet pipeline: validate, map, render, name.
pub fn export_mandae(table: &Table, today: NaiveDate) -> Result<Artifact, Error> {
    let rows = map_orders(table)?;
    let bytes = build_mandae_workbook(&rows)?;
    log::info!("built Mandae workbook with {} rows", rows.len());

    Ok(Artifact {
        filename: workbook_filename(rows.len(), today),
        mime: XLSX_MIME,
        bytes,
        rows: rows.len(),
    })
}
