//! Record shapes: the explicit field registry used for binding
//!
//! A [`RecordShape`] lists a record's fields in declaration order. Each
//! [`FieldDescriptor`] carries a typed getter and a text-coercing setter,
//! an optional column label and its validators. Shapes are built once per
//! operation and looked up by field name.
//!
//! ```
//! use excelbind::record::{Record, RecordShape};
//! use excelbind::validate::Validator;
//!
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//!     age: Option<i64>,
//! }
//!
//! impl Record for Person {
//!     fn shape() -> RecordShape<Self> {
//!         RecordShape::builder()
//!             .field("Name", |p: &Person| &p.name, |p: &mut Person, v| p.name = v)
//!             .column("A")
//!             .validate(Validator::required())
//!             .field("Age", |p: &Person| &p.age, |p: &mut Person, v| p.age = v)
//!             .column("B")
//!             .build()
//!     }
//! }
//!
//! let shape = Person::shape();
//! assert_eq!(shape.len(), 2);
//! assert!(shape.field("Age").unwrap().is_nullable());
//! ```

use crate::types::CellValue;
use crate::validate::Validator;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use thiserror::Error;

/// Error produced when cell text cannot be coerced to a field type
pub type CoerceError = Box<dyn std::error::Error + Send + Sync>;

/// Declared type of a field, with any nullable wrapper removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Text,
    Integer,
    Float,
    Boolean,
    DateTime,
    Date,
    Binary,
}

/// Text that is not a valid value of the target type
#[derive(Error, Debug)]
#[error("cannot convert '{text}' to {target:?}")]
pub struct ParseValueError {
    pub text: String,
    pub target: ValueType,
}

/// Types that can live in a record field
pub trait FieldValue: Sized + Send + Sync + 'static {
    const VALUE_TYPE: ValueType;
    const NULLABLE: bool = false;

    /// Value written to a cell
    fn to_cell(&self) -> CellValue;

    /// Coerce a cell's display text
    fn parse_text(text: &str) -> Result<Self, CoerceError>;

    /// Take the value straight from a typed cell, skipping the text
    fn from_cell(_value: &CellValue) -> Option<Self> {
        None
    }
}

impl FieldValue for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn to_cell(&self) -> CellValue {
        CellValue::String(self.clone())
    }

    fn parse_text(text: &str) -> Result<Self, CoerceError> {
        Ok(text.trim().to_string())
    }
}

macro_rules! integer_field {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::Integer;

                fn to_cell(&self) -> CellValue {
                    CellValue::Int(i64::from(*self))
                }

                fn parse_text(text: &str) -> Result<Self, CoerceError> {
                    Ok(text.trim().parse::<$ty>()?)
                }
            }
        )*
    };
}

integer_field!(i32, i64, u32);

impl FieldValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn to_cell(&self) -> CellValue {
        CellValue::Float(*self)
    }

    fn parse_text(text: &str) -> Result<Self, CoerceError> {
        Ok(text.trim().parse::<f64>()?)
    }
}

impl FieldValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Boolean;

    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }

    fn parse_text(text: &str) -> Result<Self, CoerceError> {
        CellValue::String(text.to_string()).as_bool().ok_or_else(|| {
            Box::new(ParseValueError {
                text: text.to_string(),
                target: ValueType::Boolean,
            }) as CoerceError
        })
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

fn parse_date_time(text: &str) -> Result<NaiveDateTime, CoerceError> {
    let text = text.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(value);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(value) = NaiveDate::parse_from_str(text, format) {
            return Ok(value.and_time(NaiveTime::MIN));
        }
    }
    Err(Box::new(ParseValueError {
        text: text.to_string(),
        target: ValueType::DateTime,
    }))
}

impl FieldValue for NaiveDateTime {
    const VALUE_TYPE: ValueType = ValueType::DateTime;

    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(*self)
    }

    fn parse_text(text: &str) -> Result<Self, CoerceError> {
        parse_date_time(text)
    }

    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::DateTime(d) => Some(*d),
            _ => None,
        }
    }
}

impl FieldValue for NaiveDate {
    const VALUE_TYPE: ValueType = ValueType::Date;

    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(self.and_time(NaiveTime::MIN))
    }

    fn parse_text(text: &str) -> Result<Self, CoerceError> {
        parse_date_time(text)
            .map(|d| d.date())
            .map_err(|_| {
                Box::new(ParseValueError {
                    text: text.trim().to_string(),
                    target: ValueType::Date,
                }) as CoerceError
            })
    }

    fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::DateTime(d) => Some(d.date()),
            _ => None,
        }
    }
}

impl FieldValue for Vec<u8> {
    const VALUE_TYPE: ValueType = ValueType::Binary;

    fn to_cell(&self) -> CellValue {
        CellValue::Binary(self.clone())
    }

    fn parse_text(text: &str) -> Result<Self, CoerceError> {
        Err(Box::new(ParseValueError {
            text: text.to_string(),
            target: ValueType::Binary,
        }))
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    const VALUE_TYPE: ValueType = V::VALUE_TYPE;
    const NULLABLE: bool = true;

    fn to_cell(&self) -> CellValue {
        self.as_ref().map_or(CellValue::Empty, V::to_cell)
    }

    fn parse_text(text: &str) -> Result<Self, CoerceError> {
        V::parse_text(text).map(Some)
    }

    fn from_cell(value: &CellValue) -> Option<Self> {
        V::from_cell(value).map(Some)
    }
}

type Getter<T> = Box<dyn Fn(&T) -> CellValue + Send + Sync>;
type Setter<T> =
    Box<dyn Fn(&mut T, &CellValue, &str) -> Result<(), CoerceError> + Send + Sync>;

/// One field of a record shape
pub struct FieldDescriptor<T> {
    name: String,
    column: Option<String>,
    value_type: ValueType,
    nullable: bool,
    validators: Vec<Validator>,
    getter: Getter<T>,
    setter: Setter<T>,
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column label the field is read from, as declared (not yet validated)
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Header text: the column label, or the field name when there is none
    pub fn header(&self) -> &str {
        self.column
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Current value of this field on `record`
    pub fn value(&self, record: &T) -> CellValue {
        (self.getter)(record)
    }

    /// Coerce `text` to the field type and store it on `record`
    pub fn assign_text(&self, record: &mut T, text: &str) -> Result<(), CoerceError> {
        (self.setter)(record, &CellValue::Empty, text)
    }

    /// Store a cell on `record`
    ///
    /// A typed cell the field can take as is (a date cell for a date field)
    /// is used directly; anything else goes through the display text.
    pub fn assign_cell(
        &self,
        record: &mut T,
        value: &CellValue,
        text: &str,
    ) -> Result<(), CoerceError> {
        (self.setter)(record, value, text)
    }
}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("value_type", &self.value_type)
            .field("nullable", &self.nullable)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

/// Ordered field registry for records of type `T`
#[derive(Debug)]
pub struct RecordShape<T> {
    fields: IndexMap<String, FieldDescriptor<T>>,
}

impl<T> RecordShape<T> {
    pub fn builder() -> RecordShapeBuilder<T> {
        RecordShapeBuilder {
            fields: IndexMap::new(),
        }
    }

    /// Look up a field by exact (case-sensitive) name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.get(name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<T>> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`RecordShape`]
///
/// `column` and `validate` apply to the most recently added field.
pub struct RecordShapeBuilder<T> {
    fields: IndexMap<String, FieldDescriptor<T>>,
}

impl<T: 'static> RecordShapeBuilder<T> {
    /// Add a field with a typed getter and setter
    pub fn field<V, G, S>(mut self, name: &str, get: G, set: S) -> Self
    where
        V: FieldValue,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let descriptor = FieldDescriptor {
            name: name.to_string(),
            column: None,
            value_type: V::VALUE_TYPE,
            nullable: V::NULLABLE,
            validators: Vec::new(),
            getter: Box::new(move |record: &T| get(record).to_cell()),
            setter: Box::new(move |record: &mut T, cell: &CellValue, text: &str| {
                let value = match V::from_cell(cell) {
                    Some(value) => value,
                    None => V::parse_text(text)?,
                };
                set(record, value);
                Ok(())
            }),
        };
        self.fields.insert(name.to_string(), descriptor);
        self
    }

    /// Column label (e.g. "B") the last field is read from
    pub fn column(mut self, label: &str) -> Self {
        if let Some((_, field)) = self.fields.last_mut() {
            field.column = Some(label.to_string());
        }
        self
    }

    /// Attach a validator to the last field
    pub fn validate(mut self, validator: Validator) -> Self {
        if let Some((_, field)) = self.fields.last_mut() {
            field.validators.push(validator);
        }
        self
    }

    pub fn build(self) -> RecordShape<T> {
        RecordShape {
            fields: self.fields,
        }
    }
}

/// A record type that knows its own shape
pub trait Record: Default + Send + Sync + Sized + 'static {
    fn shape() -> RecordShape<Self>;
}
