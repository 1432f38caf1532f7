// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod encoder;
pub mod error;
pub mod expand;
pub mod manifest;
pub mod matrix;
pub mod profile;

pub use error::{FixtureError, Result};
pub use matrix::{MatrixConfig, MatrixDriver};
pub use profile::{Compression, PageLayout, PageVersion, PhysicalProfile};
