//! Thread-safe in-memory sheet

use super::format;
use super::{PictureId, PicturePlacement, Sheet};
use crate::address;
use crate::error::{ExcelError, Result};
use crate::types::{CellAddress, CellRange, CellStyle, CellValue};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};

/// Column width used when none has been set
pub const DEFAULT_COLUMN_WIDTH: f64 = 9.140625;

/// Row height used when none has been set
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

#[derive(Debug, Clone, Default)]
struct CellData {
    value: CellValue,
    number_format: Option<String>,
    style: CellStyle,
}

/// A picture registered with a [`MemorySheet`]
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub id: PictureId,
    pub bytes: Vec<u8>,
    pub placement: Option<PicturePlacement>,
}

/// In-memory [`Sheet`] backed by `parking_lot` locks
///
/// Cells, layout and pictures each sit behind their own lock, so column
/// workers writing different cells only contend for the duration of a single
/// map operation.
#[derive(Debug, Default)]
pub struct MemorySheet {
    name: String,
    cells: RwLock<BTreeMap<(u32, u32), CellData>>,
    column_widths: RwLock<HashMap<u32, f64>>,
    row_heights: RwLock<HashMap<u32, f64>>,
    merged: RwLock<Vec<CellRange>>,
    frozen: RwLock<Option<(u32, u32)>>,
    pictures: Mutex<Vec<Picture>>,
}

impl MemorySheet {
    /// Create an empty sheet
    pub fn new(name: &str) -> Self {
        MemorySheet {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Create a sheet pre-filled from rows of values, starting at A1
    ///
    /// # Examples
    ///
    /// ```
    /// use excelbind::sheet::{MemorySheet, Sheet};
    /// use excelbind::types::CellValue;
    ///
    /// let sheet = MemorySheet::from_rows("Template", vec![
    ///     vec![CellValue::from("[Name]"), CellValue::from("[Age]")],
    /// ]);
    /// assert_eq!(sheet.text(1, 2), "[Age]");
    /// ```
    pub fn from_rows(name: &str, rows: Vec<Vec<CellValue>>) -> Self {
        let sheet = MemorySheet::new(name);
        {
            let mut cells = sheet.cells.write();
            for (r, row) in rows.into_iter().enumerate() {
                for (c, value) in row.into_iter().enumerate() {
                    if !value.is_empty() {
                        cells.insert(
                            (r as u32 + 1, c as u32 + 1),
                            CellData {
                                value,
                                ..Default::default()
                            },
                        );
                    }
                }
            }
        }
        sheet
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write a value by reference, e.g. `"B7"`
    pub fn set_value_at(&self, reference: &str, value: CellValue) -> Result<()> {
        let addr = address::parse_address(reference)?;
        self.set_value(addr.row(), addr.column(), value);
        Ok(())
    }

    /// Read a value by reference, e.g. `"B7"`
    pub fn value_at(&self, reference: &str) -> Result<CellValue> {
        let addr = address::parse_address(reference)?;
        Ok(self.value(addr.row(), addr.column()))
    }

    /// Display text by reference, e.g. `"B7"`
    pub fn text_at(&self, reference: &str) -> Result<String> {
        let addr = address::parse_address(reference)?;
        Ok(self.text(addr.row(), addr.column()))
    }

    /// Effective style of a cell
    pub fn style(&self, row: u32, column: u32) -> CellStyle {
        self.cells
            .read()
            .get(&(row, column))
            .map(|c| c.style.clone())
            .unwrap_or_default()
    }

    pub fn merged_ranges(&self) -> Vec<CellRange> {
        self.merged.read().clone()
    }

    /// Frozen pane split as (row, column), if any
    pub fn frozen_panes(&self) -> Option<(u32, u32)> {
        *self.frozen.read()
    }

    /// Snapshot of the picture registry in insertion order
    pub fn pictures(&self) -> Vec<Picture> {
        self.pictures.lock().clone()
    }

    /// Number of cells holding a value
    pub fn used_cell_count(&self) -> usize {
        self.cells
            .read()
            .values()
            .filter(|c| !c.value.is_empty())
            .count()
    }
}

impl Sheet for MemorySheet {
    fn dimension(&self) -> Option<CellRange> {
        let cells = self.cells.read();
        let mut used = cells
            .iter()
            .filter(|(_, c)| !c.value.is_empty())
            .map(|(key, _)| *key);

        let (first_row, first_col) = used.next()?;
        let (mut min_row, mut min_col, mut max_row, mut max_col) =
            (first_row, first_col, first_row, first_col);
        for (row, col) in used {
            min_row = min_row.min(row);
            min_col = min_col.min(col);
            max_row = max_row.max(row);
            max_col = max_col.max(col);
        }

        CellRange::new(min_row, min_col, max_row, max_col).ok()
    }

    fn value(&self, row: u32, column: u32) -> CellValue {
        self.cells
            .read()
            .get(&(row, column))
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&self, row: u32, column: u32, value: CellValue) {
        self.cells.write().entry((row, column)).or_default().value = value;
    }

    fn text(&self, row: u32, column: u32) -> String {
        self.cells
            .read()
            .get(&(row, column))
            .map(|c| format::render(&c.value, c.number_format.as_deref()))
            .unwrap_or_default()
    }

    fn number_format(&self, row: u32, column: u32) -> Option<String> {
        self.cells
            .read()
            .get(&(row, column))
            .and_then(|c| c.number_format.clone())
    }

    fn set_number_format(&self, row: u32, column: u32, format: &str) {
        self.cells.write().entry((row, column)).or_default().number_format =
            Some(format.to_string());
    }

    fn column_width(&self, column: u32) -> f64 {
        self.column_widths
            .read()
            .get(&column)
            .copied()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    fn set_column_width(&self, column: u32, width: f64) {
        self.column_widths.write().insert(column, width);
    }

    fn row_height(&self, row: u32) -> f64 {
        self.row_heights
            .read()
            .get(&row)
            .copied()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    fn set_row_height(&self, row: u32, height: f64) {
        self.row_heights.write().insert(row, height);
    }

    fn ensure_row_height(&self, row: u32, height: f64) {
        let mut heights = self.row_heights.write();
        let current = heights.get(&row).copied().unwrap_or(DEFAULT_ROW_HEIGHT);
        if current != height {
            heights.insert(row, height);
        }
    }

    fn merged_range_containing(&self, row: u32, column: u32) -> Option<CellRange> {
        self.merged
            .read()
            .iter()
            .find(|r| r.contains(row, column))
            .copied()
    }

    fn merge(&self, range: CellRange) -> Result<()> {
        let mut merged = self.merged.write();
        let overlaps = merged.iter().any(|existing| {
            range.from_row() <= existing.to_row()
                && existing.from_row() <= range.to_row()
                && range.from_column() <= existing.to_column()
                && existing.from_column() <= range.to_column()
        });
        if overlaps {
            return Err(ExcelError::SheetError(format!(
                "merged range {} overlaps an existing merged range",
                range
            )));
        }
        merged.push(range);
        Ok(())
    }

    fn apply_style(&self, range: CellRange, style: &CellStyle) {
        let mut cells = self.cells.write();
        for key in range.cells() {
            cells.entry(key).or_default().style.merge(style);
        }
    }

    fn freeze_panes(&self, row: u32, column: u32) {
        *self.frozen.write() = Some((row, column));
    }

    fn add_picture(&self, bytes: &[u8]) -> Result<PictureId> {
        let mut pictures = self.pictures.lock();
        let id = PictureId(pictures.len());
        pictures.push(Picture {
            id,
            bytes: bytes.to_vec(),
            placement: None,
        });
        Ok(id)
    }

    fn place_picture(&self, id: PictureId, placement: &PicturePlacement) -> Result<()> {
        let mut pictures = self.pictures.lock();
        let picture = pictures
            .get_mut(id.0)
            .ok_or_else(|| ExcelError::SheetError(format!("unknown picture id {}", id.0)))?;
        CellAddress::new(placement.row, placement.column)?;
        picture.placement = Some(*placement);
        Ok(())
    }
}
