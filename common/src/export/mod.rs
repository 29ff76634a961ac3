//! Export core modules shared by the CLI writers.

#[cfg(feature = "excel")]
pub mod excel_core;
