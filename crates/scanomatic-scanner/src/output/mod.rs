//! Output formatters for scan results

pub mod json;
pub mod table;
