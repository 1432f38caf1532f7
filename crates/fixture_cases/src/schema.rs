//! Schema model for describing fixture columns.
//!
//! This module provides a format-agnostic tree of logical types that the
//! encoder adapter maps onto Arrow/Parquet types.

use crate::error::CaseError;
use serde::Serialize;
use std::fmt;

/// Largest decimal precision a 128-bit decimal can hold
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Timestamp resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "us",
            TimeUnit::Nanosecond => "ns",
        }
    }
}

/// Logical column types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    /// Boolean
    Bool,
    /// 16-bit signed integer
    Int16,
    /// 64-bit signed integer
    Int64,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit float
    Float64,
    /// UTF-8 string
    Utf8,
    /// Binary with 64-bit offsets
    LargeBinary,
    /// Decimal with precision and scale
    Decimal { precision: u8, scale: u8 },
    /// Timestamp with unit and optional timezone
    Timestamp {
        unit: TimeUnit,
        timezone: Option<String>,
    },
    /// Variable-length list of a single item field
    List(Box<Field>),
    /// Ordered named members
    Struct(Vec<Field>),
}

impl LogicalType {
    pub fn is_nested(&self) -> bool {
        matches!(self, LogicalType::List(_) | LogicalType::Struct(_))
    }

    pub fn timestamp(unit: TimeUnit) -> Self {
        LogicalType::Timestamp {
            unit,
            timezone: None,
        }
    }

    pub fn timestamp_tz(unit: TimeUnit, timezone: impl Into<String>) -> Self {
        LogicalType::Timestamp {
            unit,
            timezone: Some(timezone.into()),
        }
    }

    pub fn decimal(precision: u8, scale: u8) -> Self {
        LogicalType::Decimal { precision, scale }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Bool => write!(f, "bool"),
            LogicalType::Int16 => write!(f, "int16"),
            LogicalType::Int64 => write!(f, "int64"),
            LogicalType::UInt32 => write!(f, "uint32"),
            LogicalType::Float64 => write!(f, "float64"),
            LogicalType::Utf8 => write!(f, "utf8"),
            LogicalType::LargeBinary => write!(f, "large_binary"),
            LogicalType::Decimal { precision, scale } => {
                write!(f, "decimal({}, {})", precision, scale)
            }
            LogicalType::Timestamp { unit, timezone } => match timezone {
                Some(tz) => write!(f, "timestamp[{}, {}]", unit.as_str(), tz),
                None => write!(f, "timestamp[{}]", unit.as_str()),
            },
            LogicalType::List(item) => {
                let marker = if item.nullable { "" } else { " not null" };
                write!(f, "list<{}{}>", item.logical_type, marker)
            }
            LogicalType::Struct(children) => {
                write!(f, "struct<")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", child.name, child.logical_type)?;
                }
                write!(f, ">")
            }
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub logical_type: LogicalType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable: true,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// List field whose item is `item`. The item's own nullability is kept.
    pub fn list(name: impl Into<String>, item: Field) -> Self {
        Self::new(name, LogicalType::List(Box::new(item)))
    }

    /// List field with a conventional `item` child.
    pub fn list_of(name: impl Into<String>, item_type: LogicalType, item_nullable: bool) -> Self {
        let mut item = Field::new("item", item_type);
        item.nullable = item_nullable;
        Self::list(name, item)
    }

    pub fn structure(name: impl Into<String>, children: Vec<Field>) -> Self {
        Self::new(name, LogicalType::Struct(children))
    }

    /// Number of primitive leaves below this field.
    pub fn leaf_count(&self) -> usize {
        match &self.logical_type {
            LogicalType::List(item) => item.leaf_count(),
            LogicalType::Struct(children) => children.iter().map(Field::leaf_count).sum(),
            _ => 1,
        }
    }

    /// Check type parameters that the encoder cannot represent.
    pub fn validate(&self) -> Result<(), CaseError> {
        match &self.logical_type {
            LogicalType::Decimal { precision, scale } => {
                if *scale > *precision {
                    return Err(CaseError::InvalidDecimal {
                        field: self.name.clone(),
                        precision: *precision,
                        scale: *scale,
                    });
                }
                decimal_width(*precision).map(|_| ()).ok_or_else(|| {
                    CaseError::InvalidDecimal {
                        field: self.name.clone(),
                        precision: *precision,
                        scale: *scale,
                    }
                })
            }
            LogicalType::List(item) => item.validate(),
            LogicalType::Struct(children) => children.iter().try_for_each(Field::validate),
            _ => Ok(()),
        }
    }
}

/// Ordered top-level fields of one fixture file
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Number of top-level fields marked nullable
    pub fn nullable_count(&self) -> usize {
        self.fields.iter().filter(|f| f.nullable).count()
    }

    pub fn leaf_count(&self) -> usize {
        self.fields.iter().map(Field::leaf_count).sum()
    }
}

/// Physical storage chosen for a decimal of a given precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalWidth {
    /// 4-byte integer, precision 2..=9
    Int32,
    /// 8-byte integer, precision 1 and 10..=18
    Int64,
    /// Big-endian two's complement of the given byte length
    FixedLenByteArray(usize),
}

/// Physical width the parquet writer stores a decimal of `precision` digits in.
///
/// This is the smallest width holding every value of that precision, except
/// that precision 1 is written as INT64.
///
/// Returns `None` for precision 0 or above [`MAX_DECIMAL_PRECISION`].
pub fn decimal_width(precision: u8) -> Option<DecimalWidth> {
    match precision {
        1 => Some(DecimalWidth::Int64),
        2..=9 => Some(DecimalWidth::Int32),
        10..=18 => Some(DecimalWidth::Int64),
        19..=MAX_DECIMAL_PRECISION => Some(DecimalWidth::FixedLenByteArray(
            decimal_byte_length(precision),
        )),
        _ => None,
    }
}

/// Minimal two's-complement byte length holding `10^precision - 1`.
fn decimal_byte_length(precision: u8) -> usize {
    let max_unscaled = 10u128.pow(u32::from(precision)) - 1;
    (1..=16)
        .find(|&bytes| max_unscaled < 1u128 << (bytes * 8 - 1))
        .unwrap_or(16)
}
