//! Conversion of fixture columns into Arrow arrays.
//!
//! Lists are built from offsets plus a validity buffer so a null list and an
//! empty list stay distinct; structs carry their own validity over member
//! arrays.

use super::EncodeError;
use arrow::array::{
    ArrayRef, BooleanArray, Decimal128Array, Float64Array, Int16Array, Int64Array,
    LargeBinaryArray, ListArray, StringArray, StructArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray, UInt32Array,
};
use arrow::buffer::{NullBuffer, OffsetBuffer, ScalarBuffer};
use arrow::datatypes::{
    DataType, Field as ArrowField, Fields, Schema as ArrowSchema, TimeUnit as ArrowTimeUnit,
};
use arrow::record_batch::RecordBatch;
use fixture_cases::{Column, Field, LogicalType, Schema, TimeUnit, Value};
use std::sync::Arc;

static NULL: Value = Value::Null;

pub fn arrow_field(field: &Field) -> Result<ArrowField, EncodeError> {
    Ok(ArrowField::new(
        field.name.as_str(),
        data_type(field)?,
        field.nullable,
    ))
}

pub fn arrow_schema(schema: &Schema) -> Result<ArrowSchema, EncodeError> {
    let fields = schema
        .fields
        .iter()
        .map(arrow_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ArrowSchema::new(fields))
}

fn data_type(field: &Field) -> Result<DataType, EncodeError> {
    let dt = match &field.logical_type {
        LogicalType::Bool => DataType::Boolean,
        LogicalType::Int16 => DataType::Int16,
        LogicalType::Int64 => DataType::Int64,
        LogicalType::UInt32 => DataType::UInt32,
        LogicalType::Float64 => DataType::Float64,
        LogicalType::Utf8 => DataType::Utf8,
        LogicalType::LargeBinary => DataType::LargeBinary,
        LogicalType::Decimal { precision, scale } => {
            let scale = i8::try_from(*scale).map_err(|_| {
                EncodeError::Unsupported(format!("decimal scale {} of '{}'", scale, field.name))
            })?;
            DataType::Decimal128(*precision, scale)
        }
        LogicalType::Timestamp { unit, timezone } => DataType::Timestamp(
            time_unit(*unit),
            timezone.as_deref().map(Arc::from),
        ),
        LogicalType::List(item) => DataType::List(Arc::new(arrow_field(item)?)),
        LogicalType::Struct(children) => DataType::Struct(struct_fields(children)?),
    };
    Ok(dt)
}

fn struct_fields(children: &[Field]) -> Result<Fields, EncodeError> {
    let fields = children
        .iter()
        .map(arrow_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Fields::from(fields))
}

fn time_unit(unit: TimeUnit) -> ArrowTimeUnit {
    match unit {
        TimeUnit::Second => ArrowTimeUnit::Second,
        TimeUnit::Millisecond => ArrowTimeUnit::Millisecond,
        TimeUnit::Microsecond => ArrowTimeUnit::Microsecond,
        TimeUnit::Nanosecond => ArrowTimeUnit::Nanosecond,
    }
}

/// One record batch holding every column of the case.
pub fn record_batch(schema: &Schema, columns: &[Column]) -> Result<RecordBatch, EncodeError> {
    if schema.fields.len() != columns.len() {
        return Err(EncodeError::Unsupported(format!(
            "{} schema fields but {} columns",
            schema.fields.len(),
            columns.len()
        )));
    }

    let arrays = schema
        .fields
        .iter()
        .zip(columns)
        .map(|(field, column)| {
            let values: Vec<&Value> = column.values.iter().collect();
            build_array(field, &values)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordBatch::try_new(
        Arc::new(arrow_schema(schema)?),
        arrays,
    )?)
}

/// Build the Arrow array for `field` from row values.
pub fn build_array(field: &Field, values: &[&Value]) -> Result<ArrayRef, EncodeError> {
    let array: ArrayRef = match &field.logical_type {
        LogicalType::Bool => {
            let v = collect(field, values, |v| match v {
                Value::Bool(b) => Some(*b),
                _ => None,
            })?;
            Arc::new(BooleanArray::from(v))
        }
        LogicalType::Int16 => {
            let v = collect(field, values, |v| match v {
                Value::Int(n) => i16::try_from(*n).ok(),
                _ => None,
            })?;
            Arc::new(Int16Array::from(v))
        }
        LogicalType::Int64 => Arc::new(Int64Array::from(ints(field, values)?)),
        LogicalType::UInt32 => {
            let v = collect(field, values, |v| match v {
                Value::Int(n) => u32::try_from(*n).ok(),
                _ => None,
            })?;
            Arc::new(UInt32Array::from(v))
        }
        LogicalType::Float64 => {
            let v = collect(field, values, |v| match v {
                Value::Float(x) => Some(*x),
                _ => None,
            })?;
            Arc::new(Float64Array::from(v))
        }
        LogicalType::Utf8 => {
            let v = collect(field, values, |v| match v {
                Value::Str(s) => Some(s.as_str()),
                _ => None,
            })?;
            Arc::new(StringArray::from(v))
        }
        LogicalType::LargeBinary => {
            let v = collect(field, values, |v| match v {
                Value::Str(s) => Some(s.as_bytes()),
                _ => None,
            })?;
            Arc::new(LargeBinaryArray::from_opt_vec(v))
        }
        LogicalType::Decimal { precision, scale } => {
            let v = collect(field, values, |v| match v {
                Value::Int(n) => Some(i128::from(*n)),
                _ => None,
            })?;
            let scale = i8::try_from(*scale).map_err(|_| {
                EncodeError::Unsupported(format!("decimal scale {} of '{}'", scale, field.name))
            })?;
            let array = Decimal128Array::from(v).with_precision_and_scale(*precision, scale)?;
            array.validate_decimal_precision(*precision)?;
            Arc::new(array)
        }
        LogicalType::Timestamp { unit, timezone } => {
            let v = ints(field, values)?;
            let tz = timezone.clone();
            match unit {
                TimeUnit::Second => Arc::new(TimestampSecondArray::from(v).with_timezone_opt(tz)),
                TimeUnit::Millisecond => {
                    Arc::new(TimestampMillisecondArray::from(v).with_timezone_opt(tz))
                }
                TimeUnit::Microsecond => {
                    Arc::new(TimestampMicrosecondArray::from(v).with_timezone_opt(tz))
                }
                TimeUnit::Nanosecond => {
                    Arc::new(TimestampNanosecondArray::from(v).with_timezone_opt(tz))
                }
            }
        }
        LogicalType::List(item) => build_list(field, item, values)?,
        LogicalType::Struct(children) => build_struct(field, children, values)?,
    };
    Ok(array)
}

fn build_list(field: &Field, item: &Field, values: &[&Value]) -> Result<ArrayRef, EncodeError> {
    let mut offsets: Vec<i32> = Vec::with_capacity(values.len() + 1);
    let mut validity = Vec::with_capacity(values.len());
    let mut children: Vec<&Value> = Vec::new();
    offsets.push(0);

    for (row, value) in values.iter().enumerate() {
        match value {
            Value::Null => validity.push(false),
            Value::List(items) => {
                children.extend(items.iter());
                validity.push(true);
            }
            _ => return Err(mismatch(field, row)),
        }
        let end = i32::try_from(children.len()).map_err(|_| {
            EncodeError::Unsupported(format!("list '{}' exceeds i32 offsets", field.name))
        })?;
        offsets.push(end);
    }

    let child = build_array(item, &children)?;
    let list = ListArray::try_new(
        Arc::new(arrow_field(item)?),
        OffsetBuffer::new(ScalarBuffer::from(offsets)),
        child,
        null_buffer(validity),
    )?;
    Ok(Arc::new(list))
}

fn build_struct(
    field: &Field,
    children: &[Field],
    values: &[&Value],
) -> Result<ArrayRef, EncodeError> {
    let mut validity = Vec::with_capacity(values.len());
    let mut members: Vec<Vec<&Value>> = vec![Vec::with_capacity(values.len()); children.len()];

    for (row, value) in values.iter().enumerate() {
        match value {
            Value::Null => {
                validity.push(false);
                for member in members.iter_mut() {
                    member.push(&NULL);
                }
            }
            Value::Struct(parts) if parts.len() == children.len() => {
                validity.push(true);
                for (member, part) in members.iter_mut().zip(parts) {
                    member.push(part);
                }
            }
            _ => return Err(mismatch(field, row)),
        }
    }

    let arrays = children
        .iter()
        .zip(&members)
        .map(|(child, vals)| build_array(child, vals))
        .collect::<Result<Vec<_>, _>>()?;

    let array = StructArray::try_new(struct_fields(children)?, arrays, null_buffer(validity))?;
    Ok(Arc::new(array))
}

fn ints(field: &Field, values: &[&Value]) -> Result<Vec<Option<i64>>, EncodeError> {
    collect(field, values, |v| match v {
        Value::Int(n) => Some(*n),
        _ => None,
    })
}

/// Map non-null values through `extract`, keeping nulls as `None`.
fn collect<'v, T>(
    field: &Field,
    values: &[&'v Value],
    extract: impl Fn(&'v Value) -> Option<T>,
) -> Result<Vec<Option<T>>, EncodeError> {
    values
        .iter()
        .enumerate()
        .map(|(row, &value)| match value {
            Value::Null => Ok(None),
            other => extract(other).map(Some).ok_or_else(|| mismatch(field, row)),
        })
        .collect()
}

fn mismatch(field: &Field, row: usize) -> EncodeError {
    EncodeError::ValueMismatch {
        column: field.name.clone(),
        message: format!("row {} does not fit {}", row, field.logical_type),
    }
}

fn null_buffer(validity: Vec<bool>) -> Option<NullBuffer> {
    if validity.iter().all(|valid| *valid) {
        None
    } else {
        Some(NullBuffer::from(validity))
    }
}
