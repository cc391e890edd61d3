//! Readers and writers for the file formats the CLI speaks.

pub mod csv;
pub mod json;
