// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod cancel;
mod orchestrator;
mod progress;

pub use cancel::CancellationToken;
pub use orchestrator::{IngestReport, IngestionPipeline};
pub use progress::{IngestStats, ProgressTracker};
