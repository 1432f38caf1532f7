//! Dimension expander.
//!
//! Adapts a fixture case to a physical profile without changing what the
//! rows mean: benchmark sizes are reached by tiling whole rows, and page
//! layout is requested from the encoder through size hints. Data is never
//! pre-split into pages here.

use crate::profile::PageLayout;
use fixture_cases::{Column, FixtureCase};
use std::fmt;

/// Data page size hint that fits no more than a handful of values
pub const MULTI_PAGE_SIZE: usize = 1 << 10;

/// Data page size hint no fixture can exceed
pub const SINGLE_PAGE_SIZE: usize = 1 << 40;

/// Rows of a canonical case replicated for benchmark files
pub const BENCH_TILE_ROWS: usize = 8;

/// Precondition violated while expanding a case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// Target length is not a whole number of tiles
    NotDivisible { target: usize, unit: usize },
    /// Tile is empty or longer than the case
    InvalidUnit { unit: usize, rows: usize },
    /// Multi-page layout needs at least two rows to split
    TooFewRowsForMultiPage { rows: usize },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::NotDivisible { target, unit } => write!(
                f,
                "{} rows is not a multiple of the {}-row replication unit",
                target, unit
            ),
            ExpandError::InvalidUnit { unit, rows } => write!(
                f,
                "replication unit of {} rows is invalid for a {}-row case",
                unit, rows
            ),
            ExpandError::TooFewRowsForMultiPage { rows } => write!(
                f,
                "multi-page layout needs at least 2 rows, case has {}",
                rows
            ),
        }
    }
}

impl std::error::Error for ExpandError {}

/// Repeat every column of `case` end-to-end until it has `target_rows` rows.
pub fn tile(case: &FixtureCase, target_rows: usize) -> Result<FixtureCase, ExpandError> {
    tile_prefix(case, case.num_rows(), target_rows)
}

/// Tile the first `unit` rows of every column up to `target_rows`.
///
/// Fails instead of truncating when `target_rows` is not a multiple of `unit`.
pub fn tile_prefix(
    case: &FixtureCase,
    unit: usize,
    target_rows: usize,
) -> Result<FixtureCase, ExpandError> {
    let rows = case.num_rows();
    if unit == 0 || unit > rows {
        return Err(ExpandError::InvalidUnit { unit, rows });
    }
    if target_rows % unit != 0 {
        return Err(ExpandError::NotDivisible {
            target: target_rows,
            unit,
        });
    }

    let copies = target_rows / unit;
    let columns = case
        .columns
        .iter()
        .map(|c| {
            let mut values = Vec::with_capacity(target_rows);
            for _ in 0..copies {
                values.extend_from_slice(&c.values[..unit]);
            }
            Column::new(c.name.clone(), values)
        })
        .collect();

    Ok(FixtureCase::new(
        case.id.clone(),
        case.file_name.clone(),
        case.schema.clone(),
        columns,
    ))
}

/// Page-size parameters handed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizing {
    pub data_page_size: usize,
    /// Row cap per data page; lets bit-packed columns split as well
    pub data_page_row_limit: Option<usize>,
}

/// Size hints that make the encoder realise `layout` for a case of `rows` rows.
pub fn page_sizing(layout: PageLayout, rows: usize) -> Result<PageSizing, ExpandError> {
    match layout {
        PageLayout::Single => Ok(PageSizing {
            data_page_size: SINGLE_PAGE_SIZE,
            data_page_row_limit: None,
        }),
        PageLayout::Multi => {
            if rows < 2 {
                return Err(ExpandError::TooFewRowsForMultiPage { rows });
            }
            Ok(PageSizing {
                data_page_size: MULTI_PAGE_SIZE,
                data_page_row_limit: Some(rows / 2),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_cases::cases::{BASIC_NULLABLE, BASIC_REQUIRED, NESTED};
    use fixture_cases::Value;

    #[test]
    fn test_tile_repeats_whole_case() {
        let case = BASIC_REQUIRED.build();
        let tiled = tile(&case, 30).unwrap();
        assert_eq!(tiled.num_rows(), 30);
        tiled.validate().unwrap();

        let ints = tiled.column("int64").unwrap();
        assert_eq!(ints[0], Value::Int(-256));
        assert_eq!(ints[10], Value::Int(-256));
        assert_eq!(ints[29], Value::Int(7));
    }

    #[test]
    fn test_tile_prefix_uses_first_unit_rows() {
        let case = BASIC_NULLABLE.build();
        let tiled = tile_prefix(&case, BENCH_TILE_ROWS, 1024).unwrap();
        assert_eq!(tiled.num_rows(), 1024);
        for column in &tiled.columns {
            assert_eq!(column.values.len(), 1024, "{}", column.name);
        }
        // row 8 of the case is never copied
        let ints = tiled.column("int64").unwrap();
        assert_eq!(ints[8], Value::Int(0));
        assert_eq!(ints[15], Value::Int(7));
    }

    #[test]
    fn test_tile_keeps_identity_and_schema() {
        let case = NESTED.build();
        let tiled = tile(&case, 16).unwrap();
        assert_eq!(tiled.id, case.id);
        assert_eq!(tiled.file_name, case.file_name);
        assert_eq!(tiled.schema, case.schema);
    }

    #[test]
    fn test_tile_rejects_non_multiple() {
        let case = BASIC_REQUIRED.build();
        assert_eq!(
            tile(&case, 1024).unwrap_err(),
            ExpandError::NotDivisible {
                target: 1024,
                unit: 10
            }
        );
        assert!(tile_prefix(&case, 8, 1020).is_err());
    }

    #[test]
    fn test_tile_rejects_bad_unit() {
        let case = BASIC_REQUIRED.build();
        assert!(matches!(
            tile_prefix(&case, 0, 16),
            Err(ExpandError::InvalidUnit { unit: 0, rows: 10 })
        ));
        assert!(matches!(
            tile_prefix(&case, 11, 22),
            Err(ExpandError::InvalidUnit { unit: 11, .. })
        ));
    }

    #[test]
    fn test_page_sizing() {
        let single = page_sizing(PageLayout::Single, 1).unwrap();
        assert_eq!(single.data_page_size, SINGLE_PAGE_SIZE);
        assert_eq!(single.data_page_row_limit, None);

        let multi = page_sizing(PageLayout::Multi, 1024).unwrap();
        assert_eq!(multi.data_page_size, MULTI_PAGE_SIZE);
        assert_eq!(multi.data_page_row_limit, Some(512));

        assert_eq!(
            page_sizing(PageLayout::Multi, 1),
            Err(ExpandError::TooFewRowsForMultiPage { rows: 1 })
        );
    }
}
