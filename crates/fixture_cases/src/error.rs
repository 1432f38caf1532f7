use std::fmt;

/// A fixture case whose data does not fit its schema
#[derive(Debug, Clone, PartialEq)]
pub enum CaseError {
    /// Schema field without a column, or columns out of schema order
    MissingColumn { field: String },
    /// Column not declared in the schema
    UnexpectedColumn { column: String },
    /// Column length differs from the first column's length
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    /// Null where the field forbids it
    NullInRequired { column: String, row: usize },
    /// Value variant does not match the logical type
    TypeMismatch {
        column: String,
        row: usize,
        expected: String,
    },
    /// Decimal precision/scale with no supported physical width
    InvalidDecimal {
        field: String,
        precision: u8,
        scale: u8,
    },
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::MissingColumn { field } => {
                write!(f, "schema field '{}' has no matching column", field)
            }
            CaseError::UnexpectedColumn { column } => {
                write!(f, "column '{}' is not declared in the schema", column)
            }
            CaseError::RowCountMismatch {
                column,
                expected,
                actual,
            } => write!(
                f,
                "column '{}' has {} rows, expected {}",
                column, actual, expected
            ),
            CaseError::NullInRequired { column, row } => {
                write!(f, "null in non-nullable position of '{}' at row {}", column, row)
            }
            CaseError::TypeMismatch {
                column,
                row,
                expected,
            } => write!(
                f,
                "value of '{}' at row {} does not match type {}",
                column, row, expected
            ),
            CaseError::InvalidDecimal {
                field,
                precision,
                scale,
            } => write!(
                f,
                "decimal({}, {}) of '{}' has no supported physical width",
                precision, scale, field
            ),
        }
    }
}

impl std::error::Error for CaseError {}
