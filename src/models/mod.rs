// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod classification;
pub mod filter;
pub mod message;

pub use classification::{ClassificationResult, ClassificationSource};
pub use filter::{DateRange, FilterState};
pub use message::{Message, TriageCategory, TriageLevel};
