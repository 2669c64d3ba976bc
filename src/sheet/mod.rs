//! The grid collaborator that marshaling reads from and writes into
//!
//! Storage and rendering live behind the [`Sheet`] trait. Every method takes
//! `&self` so a single sheet can be shared by the column workers of a bulk
//! write; implementations are expected to synchronize internally.
//!
//! [`MemorySheet`] is a complete in-memory implementation.

pub mod format;
pub mod memory;

use crate::error::Result;
use crate::types::{CellRange, CellStyle, CellValue};

pub use memory::MemorySheet;

/// Handle to a picture registered with a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PictureId(pub usize);

/// Where and how large a picture is drawn, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PicturePlacement {
    /// Anchor row, 1-based
    pub row: u32,
    /// Anchor column, 1-based
    pub column: u32,
    /// Horizontal offset inside the anchor cell
    pub offset_x: i32,
    /// Vertical offset inside the anchor cell
    pub offset_y: i32,
    pub width: i32,
    pub height: i32,
}

/// Two-dimensional grid of 1-based addressable cells
pub trait Sheet: Send + Sync {
    /// Bounding box of the used cells, `None` for an empty sheet
    fn dimension(&self) -> Option<CellRange>;

    /// Raw stored value
    fn value(&self, row: u32, column: u32) -> CellValue;

    fn set_value(&self, row: u32, column: u32, value: CellValue);

    /// Display text: the value rendered through the cell's number format
    fn text(&self, row: u32, column: u32) -> String;

    fn number_format(&self, row: u32, column: u32) -> Option<String>;

    fn set_number_format(&self, row: u32, column: u32, format: &str);

    fn column_width(&self, column: u32) -> f64;

    fn set_column_width(&self, column: u32, width: f64);

    fn row_height(&self, row: u32) -> f64;

    fn set_row_height(&self, row: u32, height: f64);

    /// Set the row height only when it differs from `height`
    ///
    /// Several writers may target the same row at once; repeating the call
    /// with the same height leaves the row unchanged.
    fn ensure_row_height(&self, row: u32, height: f64) {
        if self.row_height(row) != height {
            self.set_row_height(row, height);
        }
    }

    fn merged_range_containing(&self, row: u32, column: u32) -> Option<CellRange>;

    /// Merge a range into one cell; fails if it overlaps an existing merge
    fn merge(&self, range: CellRange) -> Result<()>;

    /// Layer `style` over every cell of `range`
    fn apply_style(&self, range: CellRange, style: &CellStyle);

    /// Freeze rows above `row` and columns left of `column`
    fn freeze_panes(&self, row: u32, column: u32);

    /// Register picture bytes; safe to call from several threads
    fn add_picture(&self, bytes: &[u8]) -> Result<PictureId>;

    fn place_picture(&self, id: PictureId, placement: &PicturePlacement) -> Result<()>;
}
