//! Canonical fixture cases.
//!
//! Each case bundles a schema with its value streams and the file name a
//! reader harness uses to find it. The registry is static data so drivers can
//! iterate it without per-case code.

use crate::error::CaseError;
use crate::schema::{Field, LogicalType, Schema, TimeUnit};
use crate::values::{self, Value};
use serde::Serialize;

/// One named value stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Self-contained schema + data unit written to one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureCase {
    pub id: String,
    pub schema: Schema,
    /// Columns in schema order
    pub columns: Vec<Column>,
    pub file_name: String,
}

impl FixtureCase {
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        schema: Schema,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            id: id.into(),
            schema,
            columns,
            file_name: file_name.into(),
        }
    }

    /// Row count, taken from the first column
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Check column/field pairing, equal row counts, types and nullability.
    pub fn validate(&self) -> Result<(), CaseError> {
        for field in &self.schema.fields {
            field.validate()?;
        }

        let expected_rows = self.num_rows();
        let mut fields = self.schema.fields.iter();
        for column in &self.columns {
            let field = match fields.next() {
                Some(field) if field.name == column.name => field,
                Some(field) => {
                    return Err(CaseError::MissingColumn {
                        field: field.name.clone(),
                    })
                }
                None => {
                    return Err(CaseError::UnexpectedColumn {
                        column: column.name.clone(),
                    })
                }
            };

            if column.values.len() != expected_rows {
                return Err(CaseError::RowCountMismatch {
                    column: column.name.clone(),
                    expected: expected_rows,
                    actual: column.values.len(),
                });
            }

            for (row, value) in column.values.iter().enumerate() {
                check_value(field, value, &column.name, row)?;
            }
        }

        if let Some(field) = fields.next() {
            return Err(CaseError::MissingColumn {
                field: field.name.clone(),
            });
        }
        Ok(())
    }
}

fn check_value(field: &Field, value: &Value, column: &str, row: usize) -> Result<(), CaseError> {
    let mismatch = || CaseError::TypeMismatch {
        column: column.to_string(),
        row,
        expected: field.logical_type.to_string(),
    };

    match (&field.logical_type, value) {
        (_, Value::Null) if field.nullable => Ok(()),
        (_, Value::Null) => Err(CaseError::NullInRequired {
            column: column.to_string(),
            row,
        }),
        (LogicalType::Bool, Value::Bool(_)) => Ok(()),
        (LogicalType::Int16, Value::Int(n)) => i16::try_from(*n).map(|_| ()).map_err(|_| mismatch()),
        (LogicalType::UInt32, Value::Int(n)) => u32::try_from(*n).map(|_| ()).map_err(|_| mismatch()),
        (LogicalType::Decimal { precision, .. }, Value::Int(n)) => {
            if decimal_fits(*n, *precision) {
                Ok(())
            } else {
                Err(mismatch())
            }
        }
        (LogicalType::Int64, Value::Int(_)) | (LogicalType::Timestamp { .. }, Value::Int(_)) => {
            Ok(())
        }
        (LogicalType::Float64, Value::Float(_)) => Ok(()),
        (LogicalType::Utf8, Value::Str(_)) | (LogicalType::LargeBinary, Value::Str(_)) => Ok(()),
        (LogicalType::List(item), Value::List(items)) => items
            .iter()
            .try_for_each(|v| check_value(item, v, column, row)),
        (LogicalType::Struct(children), Value::Struct(members))
            if children.len() == members.len() =>
        {
            children
                .iter()
                .zip(members)
                .try_for_each(|(f, v)| check_value(f, v, column, row))
        }
        _ => Err(mismatch()),
    }
}

/// Whether the unscaled value `n` has at most `precision` digits.
fn decimal_fits(n: i64, precision: u8) -> bool {
    match 10i128.checked_pow(u32::from(precision)) {
        Some(limit) => i128::from(n).abs() < limit,
        None => true,
    }
}

/// Static description of a canonical case
#[derive(Debug, Clone, Copy)]
pub struct CaseDescriptor {
    pub id: &'static str,
    pub file_name: &'static str,
    pub rows: usize,
    pub description: &'static str,
    build: fn() -> (Schema, Vec<Column>),
}

impl CaseDescriptor {
    /// Build fresh case data. No state is shared between calls.
    pub fn build(&self) -> FixtureCase {
        let (schema, columns) = (self.build)();
        FixtureCase::new(self.id, self.file_name, schema, columns)
    }
}

pub const BASIC_NULLABLE: CaseDescriptor = CaseDescriptor {
    id: "basic-nullable",
    file_name: "basic_nullable_10.parquet",
    rows: 10,
    description: "one nullable field per primitive type",
    build: basic_nullable,
};

pub const BASIC_REQUIRED: CaseDescriptor = CaseDescriptor {
    id: "basic-required",
    file_name: "basic_required_10.parquet",
    rows: 10,
    description: "non-nullable primitives",
    build: basic_required,
};

pub const NESTED: CaseDescriptor = CaseDescriptor {
    id: "nested",
    file_name: "nested_nullable_10.parquet",
    rows: 8,
    description: "lists across list/item nullability, lists of lists",
    build: nested,
};

pub const STRUCT: CaseDescriptor = CaseDescriptor {
    id: "struct",
    file_name: "struct_nullable_10.parquet",
    rows: 10,
    description: "struct and struct-of-struct with nullable members",
    build: structs,
};

pub const NESTED_EDGE: CaseDescriptor = CaseDescriptor {
    id: "nested-edge",
    file_name: "nested_edge_nullable_10.parquet",
    rows: 1,
    description: "single-row two-element list and single null list",
    build: nested_edge,
};

/// Every canonical case, in generation order
pub const CANONICAL_CASES: &[CaseDescriptor] =
    &[BASIC_NULLABLE, BASIC_REQUIRED, NESTED, STRUCT, NESTED_EDGE];

pub fn find_case(id: &str) -> Option<&'static CaseDescriptor> {
    let id = id.to_lowercase().replace('_', "-");
    CANONICAL_CASES.iter().find(|c| c.id == id)
}

fn basic_nullable() -> (Schema, Vec<Column>) {
    let rows = BASIC_NULLABLE.rows;
    let schema = Schema::new(vec![
        Field::new("int64", LogicalType::Int64),
        Field::new("float64", LogicalType::Float64),
        Field::new("string", LogicalType::Utf8),
        Field::new("bool", LogicalType::Bool),
        Field::new("date", LogicalType::timestamp(TimeUnit::Millisecond)),
        Field::new("uint32", LogicalType::UInt32),
        Field::new("string_large", LogicalType::Utf8),
        Field::new("decimal_9", LogicalType::decimal(9, 0)),
        Field::new("decimal_18", LogicalType::decimal(18, 0)),
        Field::new("decimal_26", LogicalType::decimal(26, 0)),
        Field::new("timestamp_us", LogicalType::timestamp(TimeUnit::Microsecond)),
        Field::new("timestamp_s", LogicalType::timestamp(TimeUnit::Second)),
        Field::new("emoji", LogicalType::Utf8),
        Field::new(
            "timestamp_s_utc",
            LogicalType::timestamp_tz(TimeUnit::Second, "UTC"),
        ),
    ]);

    // Decimal and timestamp columns reinterpret the same integer magnitudes
    let columns = vec![
        Column::new("int64", values::nullable_int64()),
        Column::new("float64", values::nullable_float64()),
        Column::new("string", values::nullable_utf8()),
        Column::new("bool", values::nullable_bool()),
        Column::new("date", values::nullable_int64()),
        Column::new("uint32", values::nullable_int64()),
        Column::new("string_large", values::large_utf8(rows)),
        Column::new("decimal_9", values::nullable_int64()),
        Column::new("decimal_18", values::nullable_int64()),
        Column::new("decimal_26", values::nullable_int64()),
        Column::new("timestamp_us", values::nullable_int64()),
        Column::new("timestamp_s", values::nullable_int64()),
        Column::new("emoji", values::emoji(rows)),
        Column::new("timestamp_s_utc", values::nullable_int64()),
    ];
    (schema, columns)
}

fn basic_required() -> (Schema, Vec<Column>) {
    let schema = Schema::new(vec![
        Field::new("int64", LogicalType::Int64).required(),
        Field::new("float64", LogicalType::Float64).required(),
        Field::new("string", LogicalType::Utf8).required(),
        Field::new("bool", LogicalType::Bool).required(),
        Field::new("date", LogicalType::timestamp(TimeUnit::Millisecond)).required(),
        Field::new("uint32", LogicalType::UInt32).required(),
        Field::new("decimal_9", LogicalType::decimal(9, 0)).required(),
        Field::new("decimal_18", LogicalType::decimal(18, 0)).required(),
        Field::new("decimal_26", LogicalType::decimal(26, 0)).required(),
    ]);

    let columns = vec![
        Column::new("int64", values::required_int64()),
        Column::new("float64", values::required_float64()),
        Column::new("string", values::required_utf8()),
        Column::new("bool", values::required_bool()),
        Column::new("date", values::required_int64()),
        Column::new("uint32", values::required_uint32()),
        Column::new("decimal_9", values::required_int64()),
        Column::new("decimal_18", values::required_int64()),
        Column::new("decimal_26", values::required_int64()),
    ];
    (schema, columns)
}

fn nested() -> (Schema, Vec<Column>) {
    let inner_required = Field::list_of("item", LogicalType::Int64, false);
    let schema = Schema::new(vec![
        Field::list_of("list_int64", LogicalType::Int64, true),
        Field::list_of("list_int64_required", LogicalType::Int64, false),
        Field::list_of("list_int64_required_list", LogicalType::Int64, true).required(),
        Field::list_of("list_int64_required_required", LogicalType::Int64, false).required(),
        Field::list_of("list_int16", LogicalType::Int16, true),
        Field::list_of("list_bool", LogicalType::Bool, true),
        Field::list_of("list_utf8", LogicalType::Utf8, true),
        Field::list_of("list_large_binary", LogicalType::LargeBinary, true),
        Field::list(
            "list_nested_i64",
            Field::list_of("item", LogicalType::Int64, true),
        ),
        Field::list("list_nested_inner_required_i64", inner_required.clone()),
        Field::list(
            "list_nested_inner_required_required_i64",
            inner_required.required(),
        ),
    ]);

    let columns = vec![
        Column::new("list_int64", values::list_int64_nullable_items()),
        Column::new("list_int64_required", values::list_int64_required_items()),
        Column::new("list_int64_required_list", values::list_int64_required_list()),
        Column::new(
            "list_int64_required_required",
            values::list_int64_all_required(),
        ),
        Column::new("list_int16", values::list_int64_nullable_items()),
        Column::new("list_bool", values::list_bool()),
        Column::new("list_utf8", values::list_utf8()),
        Column::new("list_large_binary", values::list_utf8()),
        Column::new("list_nested_i64", values::list_nested_i64()),
        Column::new(
            "list_nested_inner_required_i64",
            values::list_nested_inner_required_i64(),
        ),
        Column::new(
            "list_nested_inner_required_required_i64",
            values::list_nested_inner_required_required_i64(),
        ),
    ];
    (schema, columns)
}

fn structs() -> (Schema, Vec<Column>) {
    let members = vec![
        Field::new("f1", LogicalType::Utf8),
        Field::new("f2", LogicalType::Bool),
    ];
    let schema = Schema::new(vec![
        Field::structure("struct", members.clone()),
        Field::structure(
            "struct_struct",
            vec![
                Field::structure("f1", members),
                Field::new("f2", LogicalType::Bool),
            ],
        ),
    ]);

    let columns = vec![
        Column::new("struct", values::struct_utf8_bool()),
        Column::new("struct_struct", values::struct_struct()),
    ];
    (schema, columns)
}

fn nested_edge() -> (Schema, Vec<Column>) {
    let schema = Schema::new(vec![
        Field::list_of("simple", LogicalType::Int64, true),
        Field::list_of("null", LogicalType::Int64, true),
    ]);

    let columns = vec![
        Column::new("simple", vec![values::list(&[0i64, 1])]),
        Column::new("null", vec![Value::Null]),
    ];
    (schema, columns)
}
