//! Type definitions for sheet data

use crate::address;
use crate::error::{ExcelError, Result};
use chrono::NaiveDateTime;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Style patch applied to a cell range
///
/// Fields left as `None` keep whatever the cell already has, so patches can
/// be layered (a bold header row, then centering over the whole table).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellStyle {
    /// Bold font
    pub bold: Option<bool>,
    /// Font size in points
    pub font_size: Option<f64>,
    /// Horizontal and vertical centering
    pub centered: Option<bool>,
    /// Wrap long text inside the cell
    pub wrap_text: Option<bool>,
}

impl CellStyle {
    /// Bold text for headers
    pub fn header_bold() -> Self {
        CellStyle {
            bold: Some(true),
            ..Default::default()
        }
    }

    /// Large bold text for a title row
    pub fn title(font_size: f64) -> Self {
        CellStyle {
            bold: Some(true),
            font_size: Some(font_size),
            ..Default::default()
        }
    }

    /// Centered, word-wrapped presentation
    pub fn centered_wrap() -> Self {
        CellStyle {
            centered: Some(true),
            wrap_text: Some(true),
            ..Default::default()
        }
    }

    /// Overlay `patch` on top of this style
    pub fn merge(&mut self, patch: &CellStyle) {
        if patch.bold.is_some() {
            self.bold = patch.bold;
        }
        if patch.font_size.is_some() {
            self.font_size = patch.font_size;
        }
        if patch.centered.is_some() {
            self.centered = patch.centered;
        }
        if patch.wrap_text.is_some() {
            self.wrap_text = patch.wrap_text;
        }
    }
}

/// Represents a single cell value in a sheet
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CellValue {
    /// Empty cell
    #[default]
    Empty,
    /// String value
    String(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Date and time value
    DateTime(NaiveDateTime),
    /// Binary payload, treated as picture data when written
    Binary(Vec<u8>),
}

impl CellValue {
    /// Convert cell value to string
    ///
    /// This is the raw value, not the formatted display text; see
    /// [`crate::sheet::Sheet::text`] for the latter.
    pub fn as_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::DateTime(d) => d.to_string(),
            CellValue::Binary(_) => String::new(),
        }
    }

    /// Check if cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty, or a string made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Try to convert to integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) => Some(*f as i64),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Int(i) => Some(*i != 0),
            CellValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::DateTime(d)
    }
}

impl From<Vec<u8>> for CellValue {
    fn from(bytes: Vec<u8>) -> Self {
        CellValue::Binary(bytes)
    }
}

fn check_coordinate(value: u32, what: &str) -> Result<u32> {
    if value == 0 {
        return Err(ExcelError::InvalidCell(format!(
            "{} must be greater than 0",
            what
        )));
    }
    Ok(value)
}

/// A cell position, 1-based on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellAddress {
    row: u32,
    column: u32,
}

impl CellAddress {
    /// Create an address; both coordinates must be at least 1
    pub fn new(row: u32, column: u32) -> Result<Self> {
        Ok(CellAddress {
            row: check_coordinate(row, "row")?,
            column: check_coordinate(column, "column")?,
        })
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn set_row(&mut self, row: u32) -> Result<()> {
        self.row = check_coordinate(row, "row")?;
        Ok(())
    }

    pub fn set_column(&mut self, column: u32) -> Result<()> {
        self.column = check_coordinate(column, "column")?;
        Ok(())
    }

    /// Get Excel-style cell reference (e.g., "A1", "B2")
    pub fn reference(&self) -> String {
        format!("{}{}", address::label_for(self.column), self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

impl FromStr for CellAddress {
    type Err = ExcelError;

    fn from_str(s: &str) -> Result<Self> {
        address::parse_address(s)
    }
}

/// A rectangular block of cells, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellRange {
    from_row: u32,
    from_column: u32,
    to_row: u32,
    to_column: u32,
}

impl CellRange {
    /// Create a range; every coordinate must be at least 1
    pub fn new(from_row: u32, from_column: u32, to_row: u32, to_column: u32) -> Result<Self> {
        Ok(CellRange {
            from_row: check_coordinate(from_row, "from_row")?,
            from_column: check_coordinate(from_column, "from_column")?,
            to_row: check_coordinate(to_row, "to_row")?,
            to_column: check_coordinate(to_column, "to_column")?,
        })
    }

    /// Range covering a single cell
    pub fn single(address: CellAddress) -> Self {
        CellRange {
            from_row: address.row,
            from_column: address.column,
            to_row: address.row,
            to_column: address.column,
        }
    }

    pub fn from_row(&self) -> u32 {
        self.from_row
    }

    pub fn from_column(&self) -> u32 {
        self.from_column
    }

    pub fn to_row(&self) -> u32 {
        self.to_row
    }

    pub fn to_column(&self) -> u32 {
        self.to_column
    }

    pub fn set_from_row(&mut self, value: u32) -> Result<()> {
        self.from_row = check_coordinate(value, "from_row")?;
        Ok(())
    }

    pub fn set_from_column(&mut self, value: u32) -> Result<()> {
        self.from_column = check_coordinate(value, "from_column")?;
        Ok(())
    }

    pub fn set_to_row(&mut self, value: u32) -> Result<()> {
        self.to_row = check_coordinate(value, "to_row")?;
        Ok(())
    }

    pub fn set_to_column(&mut self, value: u32) -> Result<()> {
        self.to_column = check_coordinate(value, "to_column")?;
        Ok(())
    }

    /// Top-left cell
    pub fn start(&self) -> CellAddress {
        CellAddress {
            row: self.from_row,
            column: self.from_column,
        }
    }

    pub fn rows(&self) -> RangeInclusive<u32> {
        self.from_row..=self.to_row
    }

    pub fn columns(&self) -> RangeInclusive<u32> {
        self.from_column..=self.to_column
    }

    pub fn contains(&self, row: u32, column: u32) -> bool {
        self.rows().contains(&row) && self.columns().contains(&column)
    }

    /// Every (row, column) pair in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> {
        let columns = self.columns();
        self.rows()
            .flat_map(move |row| columns.clone().map(move |column| (row, column)))
    }

    /// Reference such as "A1:C3"
    pub fn reference(&self) -> String {
        format!(
            "{}{}:{}{}",
            address::label_for(self.from_column),
            self.from_row,
            address::label_for(self.to_column),
            self.to_row
        )
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_reference() {
        assert_eq!(CellAddress::new(1, 1).unwrap().reference(), "A1");
        assert_eq!(CellAddress::new(1, 26).unwrap().reference(), "Z1");
        assert_eq!(CellAddress::new(7, 27).unwrap().reference(), "AA7");
    }

    #[test]
    fn test_address_rejects_zero() {
        assert!(matches!(
            CellAddress::new(0, 1),
            Err(ExcelError::InvalidCell(_))
        ));
        let mut addr = CellAddress::new(2, 2).unwrap();
        assert!(addr.set_column(0).is_err());
        assert_eq!(addr.column(), 2);
    }

    #[test]
    fn test_range_cells_row_major() {
        let range = CellRange::new(1, 1, 2, 2).unwrap();
        let cells: Vec<_> = range.cells().collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
        assert_eq!(range.reference(), "A1:B2");
        assert!(range.contains(2, 1));
        assert!(!range.contains(3, 1));
        assert!(CellRange::new(1, 0, 1, 1).is_err());
    }

    #[test]
    fn test_cell_value_conversions() {
        let val = CellValue::Int(42);
        assert_eq!(val.as_i64(), Some(42));
        assert_eq!(val.as_f64(), Some(42.0));

        let val = CellValue::String("true".to_string());
        assert_eq!(val.as_bool(), Some(true));

        assert!(CellValue::String("   ".to_string()).is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn test_style_merge_keeps_unset_fields() {
        let mut style = CellStyle::header_bold();
        style.merge(&CellStyle::centered_wrap());
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.centered, Some(true));
        assert_eq!(style.wrap_text, Some(true));
        assert_eq!(style.font_size, None);
    }
}
