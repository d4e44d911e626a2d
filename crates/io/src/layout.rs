//! Declarative sheet layout: merged bands, range → style rules, widths, heights.
//!
//! A layout says nothing about cell values and never touches a spreadsheet
//! writer; `xlsx::render` consumes it. Rows and columns are 0-based, as in
//! the writer (row 0 is Excel row 1, column 0 is Excel column A).

use crate::mandae::COLUMN_COUNT;

/// 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u32);

pub const DARK_ACCENT: Rgb = Rgb(0x5F497A);
pub const LIGHT_ACCENT: Rgb = Rgb(0xFBE9E7);
pub const WHITE: Rgb = Rgb(0xFFFFFF);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
}

/// Visual state of one cell. `Default` is an unstyled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fill: Option<Rgb>,
    pub font_color: Option<Rgb>,
    pub bold: bool,
    pub align: HAlign,
    pub vertical_center: bool,
    /// Thin border on all four sides
    pub border: bool,
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl CellRange {
    pub fn new(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> Self {
        Self { first_row, first_col, last_row, last_col }
    }

    /// Columns `first_col..=last_col` of a single row.
    pub fn row_span(row: u32, first_col: u16, last_col: u16) -> Self {
        Self::new(row, first_col, row, last_col)
    }

    pub fn contains(&self, row: u32, col: u16) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &CellRange) -> CellRange {
        CellRange {
            first_row: self.first_row.min(other.first_row),
            first_col: self.first_col.min(other.first_col),
            last_row: self.last_row.max(other.last_row),
            last_col: self.last_col.max(other.last_col),
        }
    }

    /// A1-style reference, e.g. `A1:F1`.
    pub fn a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            col_to_letter(self.first_col),
            self.first_row + 1,
            col_to_letter(self.last_col),
            self.last_row + 1
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub range: CellRange,
    pub style: CellStyle,
}

/// A merged region and the text shown in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub range: CellRange,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: String,
    /// Row where the value grid (see `xlsx::render`) starts.
    pub content_row: u32,
    pub merges: Vec<Merge>,
    /// Later rules override earlier ones for the cells they cover.
    pub rules: Vec<StyleRule>,
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<(u32, f64)>,
}

impl SheetLayout {
    pub fn style_at(&self, row: u32, col: u16) -> CellStyle {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.range.contains(row, col))
            .map(|rule| rule.style)
            .unwrap_or_default()
    }

    /// Bounding box of every rule and merge.
    pub fn styled_extent(&self) -> Option<CellRange> {
        let ranges = self
            .rules
            .iter()
            .map(|r| r.range)
            .chain(self.merges.iter().map(|m| m.range));
        ranges.reduce(|a, b| a.union(&b))
    }
}

/// Convert column index to Excel column letter (0 = A, 25 = Z, 26 = AA, etc.)
pub fn col_to_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = col as usize;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

// ── Mandae intake sheet ─────────────────────────────────────────────

pub const MANDAE_SHEET_NAME: &str = "Planilha Mandae";

const LAST_COL: u16 = COLUMN_COUNT as u16 - 1;

/// (first col, last col, label) of the group band in row 1.
const GROUPS: [(u16, u16, &str); 4] = [
    (0, 5, "DESTINATÁRIO"),
    (6, 13, "ENDEREÇO"),
    (14, 17, "ENCOMENDA"),
    (18, 21, "PEDIDO MANDAE"),
];

/// N, O, P, T, V: data cells left without fill or border.
pub const UNBOXED_COLUMNS: [u16; 5] = [13, 14, 15, 19, 21];

/// U: declared value, the only right-aligned data column.
pub const DECLARED_VALUE_COLUMN: u16 = 20;

pub const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

const COLUMN_WIDTHS: [(u16, f64); 7] = [
    (0, 37.14),  // A
    (1, 30.71),  // B
    (2, 13.00),  // C
    (3, 15.71),  // D
    (6, 12.85),  // G
    (16, 51.42), // Q
    (21, 15.71), // V
];

const HEADER_ROW_HEIGHT: f64 = 30.0;

/// Layout of the intake sheet for `data_rows` rows of data.
///
/// Row 0 is the merged group band, row 1 the column headers, rows
/// `2..2 + data_rows` the data.
pub fn mandae_layout(data_rows: usize) -> SheetLayout {
    let band = CellStyle {
        fill: Some(DARK_ACCENT),
        font_color: Some(WHITE),
        bold: true,
        align: HAlign::Center,
        vertical_center: true,
        border: true,
    };
    let header = CellStyle {
        fill: Some(LIGHT_ACCENT),
        font_color: Some(DARK_ACCENT),
        align: HAlign::Center,
        vertical_center: true,
        ..CellStyle::default()
    };
    let data = CellStyle {
        fill: Some(LIGHT_ACCENT),
        align: HAlign::Left,
        vertical_center: true,
        border: true,
        ..CellStyle::default()
    };

    let mut rules = vec![
        StyleRule { range: CellRange::row_span(0, 0, LAST_COL), style: band },
        StyleRule { range: CellRange::row_span(1, 0, LAST_COL), style: header },
    ];

    if data_rows > 0 {
        let first = 2;
        let last = first + data_rows as u32 - 1;
        rules.push(StyleRule { range: CellRange::new(first, 0, last, LAST_COL), style: data });
        rules.push(StyleRule {
            range: CellRange::new(first, DECLARED_VALUE_COLUMN, last, DECLARED_VALUE_COLUMN),
            style: CellStyle { align: HAlign::Right, ..data },
        });
        for col in UNBOXED_COLUMNS {
            rules.push(StyleRule {
                range: CellRange::new(first, col, last, col),
                style: CellStyle { fill: None, border: false, ..data },
            });
        }
    }

    let merges = GROUPS
        .iter()
        .map(|&(first, last, label)| Merge {
            range: CellRange::row_span(0, first, last),
            label: label.to_string(),
        })
        .collect();

    let mut column_widths = vec![DEFAULT_COLUMN_WIDTH; COLUMN_COUNT];
    for (col, width) in COLUMN_WIDTHS {
        column_widths[col as usize] = width;
    }

    SheetLayout {
        sheet_name: MANDAE_SHEET_NAME.to_string(),
        content_row: 1,
        merges,
        rules,
        column_widths,
        row_heights: vec![(1, HEADER_ROW_HEIGHT)],
    }
}
