//! Literal value streams for fixture columns.
//!
//! Every generator is a pure function: calling it twice yields equal,
//! independently owned vectors. Null patterns are interior on purpose so a
//! reader has to handle null/non-null transitions, not only leading or
//! trailing nulls.

use crate::schema::{LogicalType, TimeUnit};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Oversized string: 256 ASCII bytes followed by four 4-byte code points.
pub const LARGE_STRING_UNIT: &str = "ABCD";
pub const LARGE_STRING_REPEAT: usize = 64;
pub const LARGE_STRING_SUFFIX: &str = "😃🌚🕳👊";

/// One cell of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Members in schema order
    Struct(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable form of this value interpreted as `logical_type`.
    pub fn render(&self, logical_type: &LogicalType) -> String {
        match (self, logical_type) {
            (Value::Null, _) => "null".to_string(),
            (Value::Int(n), LogicalType::Timestamp { unit, timezone }) => {
                let rendered = render_timestamp(*n, *unit);
                match timezone {
                    Some(tz) => format!("{} {}", rendered, tz),
                    None => rendered,
                }
            }
            (Value::Int(n), LogicalType::Decimal { scale, .. }) => render_decimal(*n, *scale),
            (Value::Str(s), LogicalType::LargeBinary) => format!("b{:?}", s),
            (Value::List(items), LogicalType::List(item)) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|v| v.render(&item.logical_type))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            (Value::Struct(members), LogicalType::Struct(children)) => {
                let parts: Vec<String> = children
                    .iter()
                    .zip(members)
                    .map(|(f, v)| format!("{}: {}", f.name, v.render(&f.logical_type)))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            (Value::Bool(b), _) => b.to_string(),
            (Value::Int(n), _) => n.to_string(),
            (Value::Float(x), _) => format!("{:?}", x),
            (Value::Str(s), _) => format!("{:?}", s),
            (other, _) => format!("{:?}", other),
        }
    }
}

fn render_timestamp(n: i64, unit: TimeUnit) -> String {
    let ts: Option<DateTime<Utc>> = match unit {
        TimeUnit::Second => DateTime::from_timestamp(n, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(n),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(n),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(n)),
    };
    match ts {
        Some(ts) => ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        None => format!("{}{} (out of range)", n, unit.as_str()),
    }
}

fn render_decimal(n: i64, scale: u8) -> String {
    if scale == 0 {
        return n.to_string();
    }
    let digits = n.unsigned_abs().to_string();
    let scale = usize::from(scale);
    let padded = format!("{:0>width$}", digits, width = scale + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);
    let sign = if n < 0 { "-" } else { "" };
    format!("{}{}.{}", sign, int_part, frac_part)
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

fn column<T: Clone + Into<Value>>(items: &[T]) -> Vec<Value> {
    items.iter().cloned().map(Into::into).collect()
}

/// List value from optional items.
pub fn list<T: Clone + Into<Value>>(items: &[T]) -> Value {
    Value::List(column(items))
}

/// `rows` copies of the same value.
pub fn repeat(value: Value, rows: usize) -> Vec<Value> {
    vec![value; rows]
}

// =============================================================================
// Flat primitives
// =============================================================================

const NULLABLE_INTS: [Option<i64>; 10] = [
    Some(0),
    Some(1),
    None,
    Some(3),
    None,
    Some(5),
    Some(6),
    Some(7),
    None,
    Some(9),
];

/// `[0, 1, ∅, 3, ∅, 5, 6, 7, ∅, 9]`
pub fn nullable_int64() -> Vec<Value> {
    column(&NULLABLE_INTS)
}

pub fn nullable_float64() -> Vec<Value> {
    NULLABLE_INTS
        .iter()
        .map(|v| v.map(|n| n as f64).into())
        .collect()
}

pub fn nullable_utf8() -> Vec<Value> {
    column(&[
        Some("Hello"),
        None,
        Some("aa"),
        Some(""),
        None,
        Some("abc"),
        None,
        None,
        Some("def"),
        Some("aaa"),
    ])
}

pub fn nullable_bool() -> Vec<Value> {
    column(&[
        Some(true),
        None,
        Some(false),
        Some(false),
        None,
        Some(true),
        None,
        None,
        Some(true),
        Some(true),
    ])
}

/// `[-256, -1, 0, 1, 2, 3, 4, 5, 6, 7]`
pub fn required_int64() -> Vec<Value> {
    column(&[-256i64, -1, 0, 1, 2, 3, 4, 5, 6, 7])
}

pub fn required_uint32() -> Vec<Value> {
    (0..10i64).map(Value::Int).collect()
}

pub fn required_float64() -> Vec<Value> {
    (0..10).map(|n| Value::Float(f64::from(n))).collect()
}

/// Repeated values so dictionary pages get reused entries.
pub fn required_utf8() -> Vec<Value> {
    column(&[
        "Hello", "bbb", "aa", "", "bbb", "abc", "bbb", "bbb", "def", "aaa",
    ])
}

pub fn required_bool() -> Vec<Value> {
    column(&[
        true, true, false, false, false, true, true, true, true, true,
    ])
}

pub fn large_string() -> String {
    let mut s = LARGE_STRING_UNIT.repeat(LARGE_STRING_REPEAT);
    s.push_str(LARGE_STRING_SUFFIX);
    s
}

pub fn large_utf8(rows: usize) -> Vec<Value> {
    repeat(Value::Str(large_string()), rows)
}

pub fn emoji(rows: usize) -> Vec<Value> {
    repeat(Value::from("😃"), rows)
}

// =============================================================================
// Lists
// =============================================================================

/// Nullable list of nullable items: null rows, an empty list and a null item.
pub fn list_int64_nullable_items() -> Vec<Value> {
    vec![
        list(&[Some(0i64), Some(1)]),
        Value::Null,
        list(&[Some(2i64), None, Some(3)]),
        list(&[4i64, 5, 6]),
        list::<i64>(&[]),
        list(&[7i64, 8, 9]),
        Value::Null,
        list(&[10i64]),
    ]
}

/// Nullable list of required items.
pub fn list_int64_required_items() -> Vec<Value> {
    vec![
        list(&[0i64, 1]),
        Value::Null,
        list(&[2i64, 0, 3]),
        list(&[4i64, 5, 6]),
        list::<i64>(&[]),
        list(&[7i64, 8, 9]),
        Value::Null,
        list(&[10i64]),
    ]
}

/// Required list of nullable items: empty lists stand where nulls would be.
pub fn list_int64_required_list() -> Vec<Value> {
    vec![
        list(&[Some(0i64), Some(1)]),
        list::<i64>(&[]),
        list(&[Some(2i64), None, Some(3)]),
        list(&[4i64, 5, 6]),
        list::<i64>(&[]),
        list(&[7i64, 8, 9]),
        list::<i64>(&[]),
        list(&[10i64]),
    ]
}

/// Required list of required items.
pub fn list_int64_all_required() -> Vec<Value> {
    vec![
        list(&[0i64, 1]),
        list::<i64>(&[]),
        list(&[2i64, 0, 3]),
        list(&[4i64, 5, 6]),
        list::<i64>(&[]),
        list(&[7i64, 8, 9]),
        list::<i64>(&[]),
        list(&[10i64]),
    ]
}

pub fn list_bool() -> Vec<Value> {
    vec![
        list(&[false, true]),
        Value::Null,
        list(&[Some(true), None, Some(false)]),
        list(&[true, false, true]),
        list::<bool>(&[]),
        list(&[false, false, false]),
        Value::Null,
        list(&[true]),
    ]
}

pub fn list_utf8() -> Vec<Value> {
    vec![
        list(&["Hello", "bbb"]),
        Value::Null,
        list(&[Some("aa"), None, Some("")]),
        list(&["bbb", "aa", "ccc"]),
        list::<&str>(&[]),
        list(&["abc", "bbb", "bbb"]),
        Value::Null,
        list(&[""]),
    ]
}

/// List of lists. Row 6 mixes an empty inner list, an inner list holding a
/// null and a null inner list.
pub fn list_nested_i64() -> Vec<Value> {
    vec![
        Value::List(vec![list(&[0i64, 1])]),
        Value::Null,
        Value::List(vec![list(&[Some(2i64), None]), list(&[3i64])]),
        Value::List(vec![list(&[4i64, 5]), list(&[6i64])]),
        Value::List(vec![]),
        Value::List(vec![list(&[7i64]), Value::Null, list(&[9i64])]),
        Value::List(vec![list::<i64>(&[]), list(&[None::<i64>]), Value::Null]),
        Value::List(vec![list(&[10i64])]),
    ]
}

/// List of nullable lists of required items.
pub fn list_nested_inner_required_i64() -> Vec<Value> {
    vec![
        Value::List(vec![list(&[0i64, 1])]),
        Value::Null,
        Value::List(vec![list(&[2i64, 3]), list(&[3i64])]),
        Value::List(vec![list(&[4i64, 5]), list(&[6i64])]),
        Value::List(vec![]),
        Value::List(vec![list(&[7i64]), Value::Null, list(&[9i64])]),
        Value::Null,
        Value::List(vec![list(&[10i64])]),
    ]
}

/// List of required lists of required items.
pub fn list_nested_inner_required_required_i64() -> Vec<Value> {
    vec![
        Value::List(vec![list(&[0i64, 1])]),
        Value::Null,
        Value::List(vec![list(&[2i64, 3]), list(&[3i64])]),
        Value::List(vec![list(&[4i64, 5]), list(&[6i64])]),
        Value::List(vec![]),
        Value::List(vec![list(&[7i64]), list(&[8i64]), list(&[9i64])]),
        Value::Null,
        Value::List(vec![list(&[10i64])]),
    ]
}

// =============================================================================
// Structs
// =============================================================================

/// `{f1: utf8, f2: bool}` rows built from the nullable string and bool columns.
pub fn struct_utf8_bool() -> Vec<Value> {
    nullable_utf8()
        .into_iter()
        .zip(nullable_bool())
        .map(|(s, b)| Value::Struct(vec![s, b]))
        .collect()
}

/// `{f1: {f1: utf8, f2: bool}, f2: bool}`
pub fn struct_struct() -> Vec<Value> {
    struct_utf8_bool()
        .into_iter()
        .zip(nullable_bool())
        .map(|(inner, b)| Value::Struct(vec![inner, b]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_deterministic() {
        assert_eq!(nullable_int64(), nullable_int64());
        assert_eq!(list_nested_i64(), list_nested_i64());
        assert_eq!(struct_struct(), struct_struct());
    }

    #[test]
    fn test_nullable_int64_has_interior_nulls() {
        let values = nullable_int64();
        assert_eq!(values.len(), 10);
        assert!(!values[0].is_null());
        assert!(values[2].is_null());
        assert!(!values[3].is_null());
        assert!(!values[9].is_null());
    }

    #[test]
    fn test_large_string_has_four_byte_code_points() {
        let s = large_string();
        assert!(s.len() >= 256);
        assert!(s.chars().any(|c| c.len_utf8() == 4));
        assert!(s.ends_with(LARGE_STRING_SUFFIX));
    }

    #[test]
    fn test_string_edges_present() {
        let values = nullable_utf8();
        assert!(values.contains(&Value::from("")));
        assert!(values.iter().any(Value::is_null));
    }

    #[test]
    fn test_list_null_distinct_from_empty() {
        let values = list_int64_nullable_items();
        assert_eq!(values[1], Value::Null);
        assert_eq!(values[4], Value::List(vec![]));
    }

    #[test]
    fn test_doubly_nested_mixed_row() {
        let values = list_nested_i64();
        match &values[6] {
            Value::List(inner) => {
                assert_eq!(inner[0], Value::List(vec![]));
                assert_eq!(inner[1], Value::List(vec![Value::Null]));
                assert_eq!(inner[2], Value::Null);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_render_timestamp_units() {
        let ms = LogicalType::timestamp(TimeUnit::Millisecond);
        assert_eq!(Value::Int(1).render(&ms), "1970-01-01T00:00:00.001");

        let s_utc = LogicalType::timestamp_tz(TimeUnit::Second, "UTC");
        assert_eq!(Value::Int(9).render(&s_utc), "1970-01-01T00:00:09 UTC");
    }

    #[test]
    fn test_render_decimal_scale() {
        assert_eq!(render_decimal(-5, 2), "-0.05");
        assert_eq!(render_decimal(1234, 2), "12.34");
        assert_eq!(render_decimal(7, 0), "7");
    }

    #[test]
    fn test_value_serializes_as_plain_json() {
        let json = serde_json::to_string(&list_int64_nullable_items()[2]).unwrap();
        assert_eq!(json, "[2,null,3]");
    }
}
