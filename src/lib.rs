// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod classifier;
pub mod config;
pub mod credentials;
pub mod error;
pub mod exporter;
pub mod mock;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod session;
pub mod utils;

pub use classifier::{ExternalClassifier, LlmClassifier, RuleEngine};
pub use config::{
    ClassificationMode, ClassifierConfig, Config, IngestConfig, OverflowPolicy, StorageConfig,
};
pub use credentials::CredentialStore;
pub use error::{Result, TriageError};
pub use exporter::{ExportManifest, JsonExporter};
pub use models::{
    ClassificationResult, ClassificationSource, DateRange, FilterState, Message, TriageCategory,
    TriageLevel,
};
pub use parser::{RowParser, Schema, SchemaDetector, detect_delimiter, parse_row};
pub use pipeline::{CancellationToken, IngestReport, IngestStats, IngestionPipeline};
pub use query::{TriageSummary, filter_messages};
pub use session::TriageSession;
pub use utils::{OperationTimer, Validator};
