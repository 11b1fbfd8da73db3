//! CSV statement ingestion: structural validation, row parsing, duplicate
//! detection and export.

mod duplicates;
mod export;
mod fields;
mod parser;
mod schema;

pub use duplicates::{against_existing, within_file, DuplicateRow};
pub use export::export_csv;
pub use fields::{parse_amount, parse_date};
pub use parser::{parse, parse_with_generator, ParseOutcome};
pub use schema::{header_fields, validate_structure, ColumnMap, StructuralError};
