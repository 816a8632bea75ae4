use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

/// How a column's values are aligned and formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Number,
    Date,
    Text,
}

impl CellKind {
    pub fn css_class(self) -> &'static str {
        match self {
            CellKind::Number => "number-cell",
            CellKind::Date => "date-cell",
            CellKind::Text => "text-cell",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Date(NaiveDateTime),
}

/// A type that can be shown in a grid column.
///
/// Text is the default kind; enums opt in with [`text_column!`](crate::text_column).
pub trait ColumnType {
    const KIND: CellKind = CellKind::Text;

    fn cell_value(&self) -> CellValue;
}

/// Date and time types accepted by date columns.
pub trait DateColumn: ColumnType {}

macro_rules! number_columns {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ColumnType for $ty {
                const KIND: CellKind = CellKind::Number;

                fn cell_value(&self) -> CellValue {
                    CellValue::Text(self.to_string())
                }
            }
        )*
    };
}

number_columns!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, Decimal,
);

/// Implements [`ColumnType`] as a text column for types that implement
/// `Display`, such as enums.
#[macro_export]
macro_rules! text_column {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::presentation::grid::ColumnType for $ty {
                fn cell_value(&self) -> $crate::presentation::grid::CellValue {
                    $crate::presentation::grid::CellValue::Text(self.to_string())
                }
            }
        )*
    };
}

text_column!(String, &str, bool, char);

impl ColumnType for DateTime<Utc> {
    const KIND: CellKind = CellKind::Date;

    fn cell_value(&self) -> CellValue {
        CellValue::Date(self.naive_utc())
    }
}

impl ColumnType for NaiveDateTime {
    const KIND: CellKind = CellKind::Date;

    fn cell_value(&self) -> CellValue {
        CellValue::Date(*self)
    }
}

impl ColumnType for NaiveDate {
    const KIND: CellKind = CellKind::Date;

    fn cell_value(&self) -> CellValue {
        CellValue::Date(self.and_time(NaiveTime::MIN))
    }
}

impl<T: ColumnType> ColumnType for Option<T> {
    const KIND: CellKind = T::KIND;

    fn cell_value(&self) -> CellValue {
        self.as_ref().map_or(CellValue::Empty, T::cell_value)
    }
}

impl DateColumn for DateTime<Utc> {}
impl DateColumn for NaiveDateTime {}
impl DateColumn for NaiveDate {}
impl<T: DateColumn> DateColumn for Option<T> {}

pub fn css_class_of<T: ColumnType>() -> &'static str {
    T::KIND.css_class()
}
