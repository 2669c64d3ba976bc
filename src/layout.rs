//! Self-describing table layout: optional title, header row, data rows

use crate::config::MarshalConfig;
use crate::error::{ExcelError, Result};
use crate::record::{FieldDescriptor, Record};
use crate::sheet::Sheet;
use crate::types::{CellRange, CellStyle, CellValue};
use crate::writer::write_cell;

/// Font size of the title row
pub const TITLE_FONT_SIZE: f64 = 24.0;

/// Height of the title row, in points
pub const TITLE_ROW_HEIGHT: f64 = 40.0;

/// Height of header and data rows, in points
pub const BODY_ROW_HEIGHT: f64 = 30.0;

/// Lay out `records` as a table starting at A1
///
/// Columns are the fields of `T` that declare a column label, in declaration
/// order; each header shows the label (or the field name when the label is
/// empty). With a title, row 1 holds it merged across the table and the
/// header moves to row 2. Panes are frozen below the header, data cells are
/// written with column auto-fit on, and the whole used range is centred and
/// word-wrapped.
///
/// Returns the used range afterwards, or `None` when `T` has no columns.
///
/// # Examples
///
/// ```
/// use excelbind::config::MarshalConfig;
/// use excelbind::layout::auto_fill;
/// use excelbind::record::{Record, RecordShape};
/// use excelbind::sheet::{MemorySheet, Sheet};
///
/// #[derive(Default)]
/// struct City {
///     name: String,
///     population: i64,
/// }
///
/// impl Record for City {
///     fn shape() -> RecordShape<Self> {
///         RecordShape::builder()
///             .field("Name", |c: &City| &c.name, |c: &mut City, v| c.name = v)
///             .column("City")
///             .field("Population", |c: &City| &c.population, |c: &mut City, v| c.population = v)
///             .column("")
///             .build()
///     }
/// }
///
/// let sheet = MemorySheet::new("Cities");
/// let cities = vec![City { name: "Oslo".into(), population: 709_000 }];
/// let range = auto_fill(&sheet, Some("Capitals"), &cities, &MarshalConfig::default())
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(range.reference(), "A1:B3");
/// assert_eq!(sheet.text(2, 2), "Population");
/// assert_eq!(sheet.text(3, 2), "709000");
/// ```
pub fn auto_fill<S: Sheet + ?Sized, T: Record>(
    sheet: &S,
    title: Option<&str>,
    records: &[T],
    config: &MarshalConfig,
) -> Result<Option<CellRange>> {
    let shape = T::shape();
    let fields: Vec<&FieldDescriptor<T>> =
        shape.fields().filter(|f| f.column().is_some()).collect();
    if fields.is_empty() {
        return Ok(None);
    }
    let last_column = u32::try_from(fields.len())
        .map_err(|_| ExcelError::InvalidCell("too many columns".to_string()))?;

    let mut header_row = 1;
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        let title_range = CellRange::new(1, 1, 1, last_column)?;
        sheet.apply_style(title_range, &CellStyle::title(TITLE_FONT_SIZE));
        if last_column > 1 {
            sheet.merge(title_range)?;
        }
        sheet.set_value(1, 1, CellValue::from(title));
        sheet.set_row_height(1, TITLE_ROW_HEIGHT);
        header_row = 2;
    }

    sheet.apply_style(
        CellRange::new(header_row, 1, header_row, last_column)?,
        &CellStyle::header_bold(),
    );
    sheet.set_row_height(header_row, BODY_ROW_HEIGHT);
    sheet.freeze_panes(header_row + 1, 1);
    for (column, field) in (1..).zip(&fields) {
        let header = field.header();
        sheet.set_value(header_row, column, CellValue::from(header));
        sheet.set_column_width(column, ((header.chars().count() + 2) * 2) as f64);
    }

    let data_config = config.with_auto_fit(true);
    for (row, record) in (header_row + 1..).zip(records) {
        for (column, field) in (1..).zip(&fields) {
            write_cell(sheet, row, column, field.value(record), &data_config)?;
        }
        sheet.set_row_height(row, BODY_ROW_HEIGHT);
    }

    let used = sheet.dimension();
    if let Some(range) = used {
        sheet.apply_style(range, &CellStyle::centered_wrap());
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        records = records.len(),
        columns = fields.len(),
        titled = header_row == 2,
        "auto-filled table"
    );

    Ok(used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordShape;
    use crate::sheet::MemorySheet;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct Order {
        id: i64,
        customer: String,
        placed: Option<NaiveDate>,
        internal: String,
    }

    impl Record for Order {
        fn shape() -> RecordShape<Self> {
            RecordShape::builder()
                .field("Id", |o: &Order| &o.id, |o: &mut Order, v| o.id = v)
                .column("")
                .field("Customer", |o: &Order| &o.customer, |o: &mut Order, v| o.customer = v)
                .column("Customer name")
                .field("Placed", |o: &Order| &o.placed, |o: &mut Order, v| o.placed = v)
                .column("Placed on")
                // not part of the table
                .field("Internal", |o: &Order| &o.internal, |o: &mut Order, v| o.internal = v)
                .build()
        }
    }

    fn orders() -> Vec<Order> {
        vec![
            Order {
                id: 1,
                customer: "Acme Corporation International".into(),
                placed: NaiveDate::from_ymd_opt(2024, 6, 1),
                internal: "hidden".into(),
            },
            Order {
                id: 2,
                customer: "Bo".into(),
                placed: None,
                internal: "hidden".into(),
            },
        ]
    }

    #[test]
    fn test_auto_fill_with_title() {
        let sheet = MemorySheet::new("Orders");
        let range = auto_fill(&sheet, Some("Q2 orders"), &orders(), &MarshalConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(range, CellRange::new(1, 1, 4, 3).unwrap());
        assert_eq!(sheet.text(1, 1), "Q2 orders");
        assert_eq!(sheet.merged_ranges(), vec![CellRange::new(1, 1, 1, 3).unwrap()]);
        assert_eq!(sheet.style(1, 2).font_size, Some(TITLE_FONT_SIZE));
        assert_eq!(sheet.row_height(1), TITLE_ROW_HEIGHT);

        assert_eq!(sheet.text(2, 1), "Id");
        assert_eq!(sheet.text(2, 2), "Customer name");
        assert_eq!(sheet.text(2, 3), "Placed on");
        assert_eq!(sheet.style(2, 3).bold, Some(true));
        assert_eq!(sheet.frozen_panes(), Some((3, 1)));

        assert_eq!(sheet.value(3, 1), CellValue::Int(1));
        assert_eq!(sheet.text(3, 3), "2024-06-01 00:00:00");
        assert_eq!(sheet.value(4, 3), CellValue::Empty);
        assert_eq!(sheet.row_height(3), BODY_ROW_HEIGHT);
        assert_eq!(sheet.row_height(4), BODY_ROW_HEIGHT);

        // every used cell is centred and wrapped, the title keeps its font
        let style = sheet.style(1, 1);
        assert_eq!(style.centered, Some(true));
        assert_eq!(style.wrap_text, Some(true));
        assert_eq!(style.bold, Some(true));
        assert_eq!(sheet.style(4, 2).centered, Some(true));
    }

    #[test]
    fn test_auto_fill_column_widths() {
        let sheet = MemorySheet::new("Orders");
        auto_fill(&sheet, None, &orders(), &MarshalConfig::default()).unwrap();

        // header "Id": (2 + 2) * 2
        assert_eq!(sheet.column_width(1), 8.0);
        // "Acme Corporation International" is 30 chars: (30 + 2) * 2
        assert_eq!(sheet.column_width(2), 64.0);
        // the rendered date is 19 chars, wider than the "Placed on" header
        assert_eq!(sheet.column_width(3), 42.0);
    }

    #[test]
    fn test_auto_fill_without_title() {
        let sheet = MemorySheet::new("Orders");
        let range = auto_fill(&sheet, None, &orders(), &MarshalConfig::default())
            .unwrap()
            .unwrap();

        assert_eq!(range.reference(), "A1:C3");
        assert_eq!(sheet.text(1, 2), "Customer name");
        assert!(sheet.merged_ranges().is_empty());
        assert_eq!(sheet.frozen_panes(), Some((2, 1)));
        assert_eq!(sheet.text(3, 2), "Bo");
    }

    #[test]
    fn test_single_column_title_is_not_merged() {
        #[derive(Default)]
        struct Tag {
            label: String,
        }
        impl Record for Tag {
            fn shape() -> RecordShape<Self> {
                RecordShape::builder()
                    .field("Label", |t: &Tag| &t.label, |t: &mut Tag, v| t.label = v)
                    .column("Label")
                    .build()
            }
        }

        let sheet = MemorySheet::new("Tags");
        auto_fill(&sheet, Some("Tags"), &[Tag { label: "red".into() }], &MarshalConfig::default())
            .unwrap();
        assert!(sheet.merged_ranges().is_empty());
        assert_eq!(sheet.text(3, 1), "red");
    }

    #[test]
    fn test_shape_without_columns_is_noop() {
        #[derive(Default)]
        struct Bare {
            x: i64,
        }
        impl Record for Bare {
            fn shape() -> RecordShape<Self> {
                RecordShape::builder()
                    .field("X", |b: &Bare| &b.x, |b: &mut Bare, v| b.x = v)
                    .build()
            }
        }

        let sheet = MemorySheet::new("Bare");
        assert!(auto_fill(&sheet, Some("t"), &[Bare { x: 1 }], &MarshalConfig::default())
            .unwrap()
            .is_none());
        assert!(sheet.dimension().is_none());
    }
}
