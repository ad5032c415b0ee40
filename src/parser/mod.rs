// file: src/parser/mod.rs
// description: delimited text parsing module exports
// reference: internal module structure

pub mod normalizer;
pub mod row;
pub mod schema;
pub mod timestamp;

pub use normalizer::InputNormalizer;
pub use row::{RowParser, parse_row};
pub use schema::{ColumnMap, Schema, SchemaDetector, detect_delimiter};
pub use timestamp::{parse_timestamp, resolve_timestamp};
