//! # excelbind
//!
//! Bind typed records to spreadsheet cells, in both directions.
//!
//! ## Features
//!
//! - **Templates**: Fill `[Field]` placeholder cells from a record
//! - **Bulk Writes**: One row per record, one worker per column (`parallel` feature)
//! - **Typed Formatting**: Date and integer number formats, embedded pictures, column auto-fit
//! - **Structured Reads**: Column-annotated fields, coercion and per-row validation
//! - **Auto Layout**: Title, header and data rows generated from a record shape
//! - **Pluggable Storage**: Everything goes through the [`Sheet`] trait; [`MemorySheet`] is built in
//!
//! ## Quick Start
//!
//! ### Filling a Template
//!
//! ```rust
//! use excelbind::{write_records, MarshalConfig, MemorySheet, Record, RecordShape, Sheet};
//!
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl Record for Person {
//!     fn shape() -> RecordShape<Self> {
//!         RecordShape::builder()
//!             .field("Name", |p: &Person| &p.name, |p: &mut Person, v| p.name = v)
//!             .column("A")
//!             .field("Age", |p: &Person| &p.age, |p: &mut Person, v| p.age = v)
//!             .column("B")
//!             .build()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = MemorySheet::from_rows("People", vec![
//!     vec!["Name".into(), "Age".into()],
//!     vec!["[Name]".into(), "[Age]".into()],
//! ]);
//! let people = vec![
//!     Person { name: "Alice".into(), age: 30 },
//!     Person { name: "Bob".into(), age: 25 },
//! ];
//!
//! write_records(&sheet, &people, 2, &MarshalConfig::default())?;
//! assert_eq!(sheet.text(3, 1), "Bob");
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading Records Back
//!
//! ```rust
//! # use excelbind::{MemorySheet, Record, RecordShape};
//! # use excelbind::types::CellValue;
//! use excelbind::read_records;
//! # #[derive(Default)]
//! # struct Person { name: String, age: i64 }
//! # impl Record for Person {
//! #     fn shape() -> RecordShape<Self> {
//! #         RecordShape::builder()
//! #             .field("Name", |p: &Person| &p.name, |p: &mut Person, v| p.name = v)
//! #             .column("A")
//! #             .field("Age", |p: &Person| &p.age, |p: &mut Person, v| p.age = v)
//! #             .column("B")
//! #             .build()
//! #     }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sheet = MemorySheet::from_rows("People", vec![
//!     vec!["Name".into(), "Age".into()],
//!     vec!["Alice".into(), CellValue::Int(30)],
//! ]);
//!
//! let people: Vec<Person> = read_records(&sheet, 2, None)?;
//! assert_eq!(people[0].age, 30);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod layout;
pub mod pixel;
pub mod placeholder;
pub mod reader;
pub mod record;
pub mod sheet;
pub mod types;
pub mod validate;
pub mod writer;

pub use address::{column_index, column_label, parse_address};
pub use config::{MarshalConfig, MarshalConfigBuilder};
pub use error::{ExcelError, Result};
pub use layout::auto_fill;
pub use placeholder::FieldBinding;
pub use reader::{merged_cell_value, read_range, read_records, read_row, RowReadResult};
pub use record::{FieldDescriptor, FieldValue, Record, RecordShape, ValueType};
pub use sheet::{MemorySheet, Sheet};
pub use types::{CellAddress, CellRange, CellStyle, CellValue};
pub use validate::Validator;
pub use writer::{write_cell, write_record, write_records};
