// file: src/query/mod.rs
// description: filtering and aggregation over a classified batch
// reference: internal module structure

pub mod filter;
pub mod stats;

pub use filter::filter_messages;
pub use stats::TriageSummary;
