//! Fixture cases for Parquet conformance files.
//!
//! Provides the schema descriptors, literal value streams and canonical case
//! registry that the matrix driver crosses with physical encoding profiles.
//!
//! # Example
//!
//! ```rust
//! use fixture_cases::{find_case, LogicalType};
//!
//! let case = find_case("basic-required").unwrap().build();
//! case.validate().unwrap();
//!
//! assert_eq!(case.num_rows(), 10);
//! assert_eq!(case.schema.field("int64").unwrap().logical_type, LogicalType::Int64);
//! ```

pub mod cases;
pub mod error;
pub mod schema;
pub mod values;

pub use cases::{find_case, CaseDescriptor, Column, FixtureCase, CANONICAL_CASES};
pub use error::CaseError;
pub use schema::{decimal_width, DecimalWidth, Field, LogicalType, Schema, TimeUnit};
pub use values::Value;
