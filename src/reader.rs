//! Reading annotated columns back into typed records
//!
//! Only fields that declare a column label take part. For every row the
//! reader validates the raw cell value, coerces the cell to the field type
//! (date cells directly, everything else from its display text) and decides
//! whether the row carries data at all. Rows without
//! data are skipped; the first row with data that fails validation stops the
//! whole read.

use crate::address;
use crate::error::{ExcelError, Result};
use crate::record::{Record, RecordShape};
use crate::sheet::Sheet;
use crate::types::CellValue;

/// Default first data row (row 1 holds the headers)
pub const DEFAULT_START_ROW: u32 = 2;

/// Outcome of reading a single row
#[derive(Debug)]
pub struct RowReadResult<T> {
    pub record: T,
    /// Validation messages, each tagged with row and column
    pub errors: Vec<String>,
}

impl<T> RowReadResult<T> {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Value shown at (row, column), looking through merged ranges
///
/// Cells inside a merged range report the value of the range's top-left
/// cell.
pub fn merged_cell_value<S: Sheet + ?Sized>(sheet: &S, row: u32, column: u32) -> CellValue {
    match sheet.merged_range_containing(row, column) {
        Some(range) => sheet.value(range.from_row(), range.from_column()),
        None => sheet.value(row, column),
    }
}

/// Read one row into a fresh record
///
/// Returns `Ok(None)` when no field received a value. Validation failures
/// are collected in the result rather than returned as an error; a bad
/// column label or a failed coercion is an error.
pub fn read_row<S: Sheet + ?Sized, T: Default>(
    sheet: &S,
    shape: &RecordShape<T>,
    row: u32,
) -> Result<Option<RowReadResult<T>>> {
    let mut record = T::default();
    let mut errors = Vec::new();
    let mut has_data = false;

    for field in shape.fields() {
        let Some(label) = field.column().filter(|c| !c.is_empty()) else {
            continue;
        };
        let column = address::column_index(label)?;

        let value = sheet.value(row, column);
        for validator in field.validators() {
            if !validator.is_valid(&value) {
                errors.push(format!(
                    "{} at row {}, column {}",
                    validator.format_message(field.name()),
                    row,
                    label
                ));
            }
        }

        let text = sheet.text(row, column);
        if text.is_empty() {
            continue;
        }
        field
            .assign_cell(&mut record, &value, &text)
            .map_err(|source| ExcelError::CoercionFailed {
                row,
                column: label.to_string(),
                text: text.clone(),
                source,
            })?;
        has_data = true;
    }

    if !has_data {
        return Ok(None);
    }
    Ok(Some(RowReadResult { record, errors }))
}

/// Read rows `start_row..=end_row` with an explicit shape
///
/// `end_row` is clamped to the last used row of the sheet and defaults to
/// it. A sheet with no used range yields no records.
pub fn read_range<S: Sheet + ?Sized, T: Default>(
    sheet: &S,
    shape: &RecordShape<T>,
    start_row: u32,
    end_row: Option<u32>,
) -> Result<Vec<T>> {
    if start_row == 0 {
        return Err(ExcelError::InvalidCell(
            "start row must be greater than 0".to_string(),
        ));
    }
    let used_to = sheet.dimension().map_or(0, |range| range.to_row());
    let last_row = end_row.map_or(used_to, |end| end.min(used_to));

    let mut records = Vec::new();
    for row in start_row..=last_row {
        let read = match read_row(sheet, shape, row) {
            Ok(read) => read,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(row, error = %err, "read aborted");
                return Err(err);
            }
        };
        let Some(read) = read else {
            continue;
        };
        if !read.is_valid() {
            #[cfg(feature = "tracing")]
            tracing::warn!(row, errors = read.errors.len(), "read aborted by validation");
            return Err(ExcelError::ValidationFailed {
                row,
                messages: read.errors,
            });
        }
        records.push(read.record);
    }

    Ok(records)
}

/// Read `T` records from `start_row` on, using [`Record::shape`]
///
/// # Examples
///
/// ```
/// use excelbind::reader::read_records;
/// use excelbind::record::{Record, RecordShape};
/// use excelbind::sheet::MemorySheet;
/// use excelbind::types::CellValue;
///
/// #[derive(Default)]
/// struct Item {
///     sku: String,
///     qty: Option<i64>,
/// }
///
/// impl Record for Item {
///     fn shape() -> RecordShape<Self> {
///         RecordShape::builder()
///             .field("Sku", |i: &Item| &i.sku, |i: &mut Item, v| i.sku = v)
///             .column("A")
///             .field("Qty", |i: &Item| &i.qty, |i: &mut Item, v| i.qty = v)
///             .column("B")
///             .build()
///     }
/// }
///
/// let sheet = MemorySheet::from_rows("Stock", vec![
///     vec!["Sku".into(), "Qty".into()],
///     vec!["A-100".into(), CellValue::Int(3)],
///     vec!["B-200".into(), CellValue::Empty],
/// ]);
///
/// let items: Vec<Item> = read_records(&sheet, 2, None).unwrap();
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[0].qty, Some(3));
/// assert_eq!(items[1].qty, None);
/// ```
pub fn read_records<S: Sheet + ?Sized, T: Record>(
    sheet: &S,
    start_row: u32,
    end_row: Option<u32>,
) -> Result<Vec<T>> {
    read_range(sheet, &T::shape(), start_row, end_row)
}
