//! Writing record values into template sheets
//!
//! Three entry points, smallest first:
//!
//! - [`write_cell`] writes one typed value with date/integer/picture
//!   formatting and the column-width policy.
//! - [`write_record`] substitutes one record into every placeholder cell.
//! - [`write_records`] scans the placeholders once and fills one row per
//!   record starting at a given row, one worker per bound column.
//!
//! # Examples
//!
//! ```
//! use excelbind::config::MarshalConfig;
//! use excelbind::record::{Record, RecordShape};
//! use excelbind::sheet::{MemorySheet, Sheet};
//! use excelbind::writer::write_records;
//!
//! #[derive(Default)]
//! struct Row {
//!     name: String,
//!     qty: i64,
//! }
//!
//! impl Record for Row {
//!     fn shape() -> RecordShape<Self> {
//!         RecordShape::builder()
//!             .field("Name", |r: &Row| &r.name, |r: &mut Row, v| r.name = v)
//!             .field("Qty", |r: &Row| &r.qty, |r: &mut Row, v| r.qty = v)
//!             .build()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = MemorySheet::from_rows("Report", vec![
//!     vec!["[Name]".into(), "[Qty]".into()],
//! ]);
//! let rows = vec![
//!     Row { name: "bolts".into(), qty: 40 },
//!     Row { name: "nuts".into(), qty: 12 },
//! ];
//!
//! write_records(&sheet, &rows, 2, &MarshalConfig::default())?;
//!
//! assert_eq!(sheet.text(3, 1), "nuts");
//! assert_eq!(sheet.text(2, 2), "40");
//! # Ok(())
//! # }
//! ```

use crate::config::{MarshalConfig, INTEGER_FORMAT};
use crate::error::{ExcelError, Result};
use crate::pixel;
use crate::placeholder;
use crate::record::{FieldDescriptor, Record};
use crate::sheet::Sheet;
use crate::types::CellValue;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Write a single value into (row, column)
///
/// - `Empty` clears the cell.
/// - Dates get the configured date format, integers the `#0` format.
/// - Binary values are embedded as a picture: the column and row are sized to
///   the configured picture size first and the cell text is left empty.
///
/// Afterwards, with auto-fit on and a non-empty value, the column grows to
/// `(len + 2) * 2` if that is wider. The width is always capped at the
/// configured maximum.
pub fn write_cell<S: Sheet + ?Sized>(
    sheet: &S,
    row: u32,
    column: u32,
    value: CellValue,
    config: &MarshalConfig,
) -> Result<()> {
    let value = match value {
        CellValue::Empty => {
            sheet.set_value(row, column, CellValue::Empty);
            return Ok(());
        }
        CellValue::DateTime(_) => {
            sheet.set_number_format(row, column, config.date_format());
            value
        }
        CellValue::Int(_) => {
            sheet.set_number_format(row, column, INTEGER_FORMAT);
            value
        }
        CellValue::Binary(bytes) => {
            let (width, height) = config.picture_default_size();
            sheet.set_column_width(column, width);
            // other column workers may size the same row concurrently
            sheet.ensure_row_height(row, height);
            pixel::insert_picture(sheet, &bytes, row, column, true, config)?;
            CellValue::Empty
        }
        other => other,
    };

    let text_len = value.as_string().chars().count();
    sheet.set_value(row, column, value);

    let current = sheet.column_width(column);
    let mut width = current;
    if config.auto_fit_column() && text_len > 0 {
        width = width.max(((text_len + 2) * 2) as f64);
    }
    width = width.min(config.max_column_width());
    if width != current {
        sheet.set_column_width(column, width);
    }

    Ok(())
}

/// Substitute one record into every placeholder of the sheet
///
/// Placeholders naming a field of `T` receive that field's value; those
/// naming an unknown field are cleared. A sheet with no used range is left
/// as is.
pub fn write_record<S: Sheet + ?Sized, T: Record>(
    sheet: &S,
    record: &T,
    config: &MarshalConfig,
) -> Result<()> {
    let Some(range) = sheet.dimension() else {
        return Ok(());
    };
    let shape = T::shape();

    for (row, column) in range.cells() {
        let Some(name) = placeholder::match_cell(sheet, row, column, config.placeholder()) else {
            continue;
        };
        match shape.field(&name) {
            Some(field) => write_cell(sheet, row, column, field.value(record), config)?,
            None => sheet.set_value(row, column, CellValue::Empty),
        }
    }

    Ok(())
}

/// Fill one row per record, starting at `start_row`
///
/// The template is scanned once; each bound column is then written by its
/// own worker (in parallel with the `parallel` feature). Columns whose
/// placeholder names no field of `T` are left untouched. An empty `records`
/// slice leaves the sheet, placeholders included, unchanged.
pub fn write_records<S: Sheet + ?Sized, T: Record>(
    sheet: &S,
    records: &[T],
    start_row: u32,
    config: &MarshalConfig,
) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    if start_row == 0 {
        return Err(ExcelError::InvalidCell(
            "start row must be greater than 0".to_string(),
        ));
    }
    let last_row = u32::try_from(records.len() - 1)
        .ok()
        .and_then(|offset| start_row.checked_add(offset));
    if last_row.is_none() {
        return Err(ExcelError::InvalidCell(format!(
            "{} records starting at row {} overflow the sheet",
            records.len(),
            start_row
        )));
    }

    let binding = placeholder::scan(sheet, config);
    let shape = T::shape();
    let columns: Vec<(u32, &FieldDescriptor<T>)> = binding
        .iter()
        .filter_map(|(column, name)| shape.field(name).map(|field| (column, field)))
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        records = records.len(),
        columns = columns.len(),
        start_row,
        parallel = cfg!(feature = "parallel"),
        "writing records"
    );

    #[cfg(feature = "parallel")]
    let result = columns.par_iter().try_for_each(|(column, field)| {
        write_column(sheet, records, start_row, *column, field, config)
    });

    #[cfg(not(feature = "parallel"))]
    let result = columns.iter().try_for_each(|(column, field)| {
        write_column(sheet, records, start_row, *column, field, config)
    });

    result
}

fn write_column<S: Sheet + ?Sized, T>(
    sheet: &S,
    records: &[T],
    start_row: u32,
    column: u32,
    field: &FieldDescriptor<T>,
    config: &MarshalConfig,
) -> Result<()> {
    // the caller has checked that the last row fits in u32
    for (offset, record) in records.iter().enumerate() {
        let row = start_row + offset as u32;
        write_cell(sheet, row, column, field.value(record), config)?;
    }
    Ok(())
}
