//! Placeholder discovery in template sheets
//!
//! A placeholder is a cell whose text matches the configured pattern, e.g.
//! `[Name]`. The pattern's single capture group, trimmed, is the field name.

use crate::config::MarshalConfig;
use crate::sheet::Sheet;
use crate::types::{CellRange, CellValue};
use indexmap::IndexMap;
use regex::Regex;

/// Column index -> field name, built once per scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBinding {
    columns: IndexMap<u32, String>,
}

impl FieldBinding {
    /// Field bound to `column`
    pub fn get(&self, column: u32) -> Option<&str> {
        self.columns.get(&column).map(String::as_str)
    }

    /// (column, field name) pairs in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.columns.iter().map(|(c, f)| (*c, f.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Keep the first field seen for a column
    fn bind(&mut self, column: u32, field: String) {
        self.columns.entry(column).or_insert(field);
    }
}

/// Field name referenced by the placeholder in (row, column), if any
pub fn match_cell<S: Sheet + ?Sized>(
    sheet: &S,
    row: u32,
    column: u32,
    pattern: &Regex,
) -> Option<String> {
    let value = sheet.value(row, column);
    if value.is_blank() || matches!(value, CellValue::Binary(_)) {
        return None;
    }

    let text = value.as_string();
    let captures = pattern.captures(text.trim())?;
    Some(
        captures
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    )
}

/// Scan the sheet's used range for placeholders
///
/// Every placeholder cell found is cleared, so a second scan of the same
/// sheet returns an empty binding. An empty sheet yields an empty binding
/// and is left untouched.
pub fn scan<S: Sheet + ?Sized>(sheet: &S, config: &MarshalConfig) -> FieldBinding {
    match sheet.dimension() {
        Some(range) => scan_range(sheet, range, config.placeholder()),
        None => FieldBinding::default(),
    }
}

/// Scan `range` row by row; the first placeholder found in a column wins
pub fn scan_range<S: Sheet + ?Sized>(sheet: &S, range: CellRange, pattern: &Regex) -> FieldBinding {
    let mut binding = FieldBinding::default();

    for (row, column) in range.cells() {
        let Some(field) = match_cell(sheet, row, column, pattern) else {
            continue;
        };
        if !field.is_empty() {
            binding.bind(column, field);
        }
        sheet.set_value(row, column, CellValue::Empty);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        range = %range,
        columns = binding.len(),
        "scanned template placeholders"
    );

    binding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::MemorySheet;

    fn template() -> MemorySheet {
        MemorySheet::from_rows(
            "Template",
            vec![
                vec!["Title".into(), CellValue::Empty, "[ Age ]".into()],
                vec!["[Name]".into(), "plain".into(), "[Other]".into()],
                vec!["[Late]".into(), CellValue::Int(5), "  ".into()],
            ],
        )
    }

    #[test]
    fn test_scan_binds_first_placeholder_per_column() {
        let sheet = template();
        let binding = scan(&sheet, &MarshalConfig::default());

        assert_eq!(binding.len(), 2);
        assert_eq!(binding.get(1), Some("Name"));
        assert_eq!(binding.get(3), Some("Age"));
        assert_eq!(binding.get(2), None);
    }

    #[test]
    fn test_scan_consumes_placeholders() {
        let sheet = template();
        scan(&sheet, &MarshalConfig::default());

        // later duplicates in a column are cleared as well
        assert_eq!(sheet.value(3, 1), CellValue::Empty);
        assert_eq!(sheet.value(2, 3), CellValue::Empty);
        assert_eq!(sheet.value(1, 1), CellValue::from("Title"));
        assert_eq!(sheet.value(2, 2), CellValue::from("plain"));
        assert_eq!(sheet.value(3, 2), CellValue::Int(5));

        let again = scan(&sheet, &MarshalConfig::default());
        assert!(again.is_empty());
    }

    #[test]
    fn test_scan_empty_sheet() {
        let sheet = MemorySheet::new("Empty");
        assert!(scan(&sheet, &MarshalConfig::default()).is_empty());
        assert!(sheet.dimension().is_none());
    }

    #[test]
    fn test_custom_pattern() {
        let sheet = MemorySheet::from_rows("T", vec![vec!["{{id}}".into(), "[Name]".into()]]);
        let config = MarshalConfig::builder()
            .placeholder_pattern(r"\{\{(\w+)\}\}")
            .build()
            .unwrap();

        let binding = scan(&sheet, &config);
        assert_eq!(binding.iter().collect::<Vec<_>>(), vec![(1, "id")]);
        assert_eq!(sheet.value(1, 2), CellValue::from("[Name]"));
    }

    #[test]
    fn test_scan_range_limits_area() {
        let sheet = template();
        let range = CellRange::new(2, 1, 2, 2).unwrap();
        let binding = scan_range(&sheet, range, MarshalConfig::default().placeholder());
        assert_eq!(binding.iter().collect::<Vec<_>>(), vec![(1, "Name")]);
        assert_eq!(sheet.value(2, 3), CellValue::from("[Other]"));
    }
}
