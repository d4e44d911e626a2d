// XLSX rendering of a declarative SheetLayout

use std::collections::HashMap;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::error::ExportError;
use crate::layout::{CellRange, CellStyle, HAlign, SheetLayout};

/// Render `grid` under `layout` into an in-memory XLSX file.
///
/// `grid[0]` lands on `layout.content_row`; every cell in the layout's styled
/// extent gets its style even when the grid has no value for it. Merged
/// regions carry their label and the style of their first cell.
pub fn render(layout: &SheetLayout, grid: &[Vec<&str>]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(&layout.sheet_name)
        .map_err(|e| xlsx_err(format!("Failed to create sheet '{}'", layout.sheet_name), e))?;

    let mut formats = FormatCache::default();

    // Merges first: merge_range() writes the label plus formatted blanks over the
    // whole region, and those cells are skipped below.
    for merge in &layout.merges {
        let r = merge.range;
        let format = formats.get(layout.style_at(r.first_row, r.first_col));
        worksheet
            .merge_range(r.first_row, r.first_col, r.last_row, r.last_col, &merge.label, format)
            .map_err(|e| xlsx_err(format!("Failed to write merge {}", r.a1()), e))?;
    }

    let mut bounds = layout.styled_extent();
    if !grid.is_empty() {
        let grid_cols = grid.iter().map(Vec::len).max().unwrap_or(0).max(1) as u16;
        let last_row = layout.content_row + grid.len() as u32 - 1;
        let grid_range = CellRange::new(layout.content_row, 0, last_row, grid_cols - 1);
        bounds = Some(bounds.map_or(grid_range, |b| b.union(&grid_range)));
    }

    if let Some(b) = bounds {
        for row in b.first_row..=b.last_row {
            for col in b.first_col..=b.last_col {
                if layout.merges.iter().any(|m| m.range.contains(row, col)) {
                    continue;
                }
                let value = row
                    .checked_sub(layout.content_row)
                    .and_then(|offset| grid.get(offset as usize))
                    .and_then(|cells| cells.get(col as usize))
                    .copied()
                    .unwrap_or("");
                write_cell(worksheet, row, col, value, layout.style_at(row, col), &mut formats)?;
            }
        }
    }

    apply_dimensions(worksheet, layout)?;
    finish(workbook, layout.sheet_name.as_str())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    style: CellStyle,
    formats: &mut FormatCache,
) -> Result<(), ExportError> {
    let result = match (value.is_empty(), style == CellStyle::default()) {
        (true, true) => return Ok(()),
        (true, false) => worksheet.write_blank(row, col, formats.get(style)),
        (false, true) => worksheet.write_string(row, col, value),
        (false, false) => worksheet.write_string_with_format(row, col, value, formats.get(style)),
    };
    result
        .map(|_| ())
        .map_err(|e| xlsx_err(format!("Failed to write cell ({row}, {col})"), e))
}

fn apply_dimensions(worksheet: &mut Worksheet, layout: &SheetLayout) -> Result<(), ExportError> {
    for (col, width) in layout.column_widths.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(|e| xlsx_err(format!("Failed to set column {col} width"), e))?;
    }
    for (row, height) in &layout.row_heights {
        worksheet
            .set_row_height(*row, *height)
            .map_err(|e| xlsx_err(format!("Failed to set row {row} height"), e))?;
    }
    Ok(())
}

fn finish(mut workbook: Workbook, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    let bytes = workbook
        .save_to_buffer()
        .map_err(|e| xlsx_err("Failed to save XLSX file".to_string(), e))?;
    log::debug!("rendered sheet '{sheet_name}' ({} bytes)", bytes.len());
    Ok(bytes)
}

fn xlsx_err(context: String, err: rust_xlsxwriter::XlsxError) -> ExportError {
    ExportError::Xlsx(format!("{context}: {err}"))
}

/// One rust_xlsxwriter Format per distinct CellStyle.
#[derive(Default)]
struct FormatCache {
    formats: HashMap<CellStyle, Format>,
}

impl FormatCache {
    fn get(&mut self, style: CellStyle) -> &Format {
        self.formats.entry(style).or_insert_with(|| build_format(style))
    }
}

fn build_format(style: CellStyle) -> Format {
    let mut format = Format::new();

    if style.bold {
        format = format.set_bold();
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color.0));
    }
    if let Some(color) = style.fill {
        format = format.set_background_color(Color::RGB(color.0));
    }

    format = match style.align {
        HAlign::General => format,
        HAlign::Left => format.set_align(FormatAlign::Left),
        HAlign::Center => format.set_align(FormatAlign::Center),
        HAlign::Right => format.set_align(FormatAlign::Right),
    };
    if style.vertical_center {
        format = format.set_align(FormatAlign::VerticalCenter);
    }

    if style.border {
        format = format.set_border(FormatBorder::Thin);
    }

    format
}
