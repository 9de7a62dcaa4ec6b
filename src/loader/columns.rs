//! Column conversion
//!
//! Turns Arrow arrays into SQLite values row by row, following the stored
//! type `SqlType::for_arrow` picks for each column.

use arrow::array::{
    Array, ArrayRef, AsArray, BinaryArray, BooleanArray, Date32Array, Float64Array, Int64Array,
    StringArray,
};
use arrow::compute::kernels::cast::{cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use arrow::util::display::array_value_to_string;
use rusqlite::types::Value;

use crate::error::Result;
use crate::store::SqlType;

/// One column of a record batch, normalized for row-wise extraction
pub enum ColumnValues {
    /// Integers, and timestamps as ticks of their own unit
    Integer(Int64Array),
    Real(Float64Array),
    Boolean(BooleanArray),
    Date(Date32Array),
    Text(StringArray),
    Blob(BinaryArray),
    /// Rendered as text: exact decimals, and types without a SQLite counterpart
    Display(ArrayRef),
}

impl ColumnValues {
    /// Normalize an Arrow array
    ///
    /// Casts are strict: a value that does not fit the target type fails
    /// the load instead of silently becoming NULL.
    pub fn from_array(array: &ArrayRef) -> Result<Self> {
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };

        let values = match SqlType::for_arrow(array.data_type()) {
            SqlType::Integer | SqlType::Timestamp(_) => {
                let cast = cast_with_options(array, &DataType::Int64, &options)?;
                ColumnValues::Integer(cast.as_primitive::<Int64Type>().clone())
            }
            SqlType::Real => {
                let cast = cast_with_options(array, &DataType::Float64, &options)?;
                ColumnValues::Real(cast.as_primitive::<Float64Type>().clone())
            }
            SqlType::Boolean => ColumnValues::Boolean(array.as_boolean().clone()),
            SqlType::Date => {
                let cast = cast_with_options(array, &DataType::Date32, &options)?;
                ColumnValues::Date(cast.as_primitive::<Date32Type>().clone())
            }
            SqlType::Blob => {
                let cast = cast_with_options(array, &DataType::Binary, &options)?;
                ColumnValues::Blob(cast.as_binary::<i32>().clone())
            }
            SqlType::Text if is_string_like(array.data_type()) => {
                let cast = cast_with_options(array, &DataType::Utf8, &options)?;
                ColumnValues::Text(cast.as_string::<i32>().clone())
            }
            SqlType::Decimal | SqlType::Text => ColumnValues::Display(array.clone()),
        };

        Ok(values)
    }

    /// SQLite value at `row`
    pub fn value(&self, row: usize) -> Result<Value> {
        let value = match self {
            ColumnValues::Integer(a) if a.is_null(row) => Value::Null,
            ColumnValues::Integer(a) => Value::Integer(a.value(row)),
            ColumnValues::Real(a) if a.is_null(row) => Value::Null,
            ColumnValues::Real(a) => Value::Real(a.value(row)),
            ColumnValues::Boolean(a) if a.is_null(row) => Value::Null,
            ColumnValues::Boolean(a) => Value::Integer(i64::from(a.value(row))),
            ColumnValues::Date(a) if a.is_null(row) => Value::Null,
            ColumnValues::Date(a) => Value::Integer(i64::from(a.value(row))),
            ColumnValues::Text(a) if a.is_null(row) => Value::Null,
            ColumnValues::Text(a) => Value::Text(a.value(row).to_string()),
            ColumnValues::Blob(a) if a.is_null(row) => Value::Null,
            ColumnValues::Blob(a) => Value::Blob(a.value(row).to_vec()),
            ColumnValues::Display(a) if a.is_null(row) => Value::Null,
            ColumnValues::Display(a) => Value::Text(array_value_to_string(a, row)?),
        };
        Ok(value)
    }
}

fn is_string_like(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, value) => {
            matches!(value.as_ref(), DataType::Utf8 | DataType::LargeUtf8)
        }
        _ => false,
    }
}
