// file: src/pipeline/orchestrator.rs
// description: drives schema detection, row parsing and classification for one upload
// reference: orchestrates the sequential ingestion workflow

use crate::classifier::{ExternalClassifier, LlmClassifier, RuleEngine};
use crate::config::{ClassificationMode, Config, IngestConfig};
use crate::error::{Result, TriageError};
use crate::models::{ClassificationResult, ClassificationSource, Message};
use crate::parser::{InputNormalizer, RowParser, Schema, SchemaDetector, resolve_timestamp};
use crate::pipeline::cancel::CancellationToken;
use crate::pipeline::progress::{IngestStats, ProgressTracker};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Outcome of a successful pass. Skipped rows are only visible through counts.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub batch_id: Uuid,
    pub messages: Vec<Message>,
    pub skipped: usize,
    pub effective_mode: ClassificationMode,
    pub stats: IngestStats,
}

struct RowContext<'a> {
    schema: &'a Schema,
    parser: &'a RowParser,
    mode: ClassificationMode,
    ingested_at: DateTime<Utc>,
    cancel: &'a CancellationToken,
}

pub struct IngestionPipeline<C = LlmClassifier> {
    settings: IngestConfig,
    normalizer: InputNormalizer,
    detector: SchemaDetector,
    rules: RuleEngine,
    external: Option<C>,
}

impl IngestionPipeline<LlmClassifier> {
    pub fn from_config(config: &Config) -> Self {
        Self::with_external(
            config.ingest.clone(),
            LlmClassifier::new(config.classifier.clone()),
        )
    }

    pub fn rule_only(settings: IngestConfig) -> Self {
        Self {
            settings: IngestConfig {
                mode: ClassificationMode::RuleOnly,
                ..settings
            },
            normalizer: InputNormalizer::new(),
            detector: SchemaDetector::new(),
            rules: RuleEngine::new(),
            external: None,
        }
    }
}

impl<C: ExternalClassifier> IngestionPipeline<C> {
    pub fn with_external(settings: IngestConfig, external: C) -> Self {
        Self {
            settings,
            normalizer: InputNormalizer::new(),
            detector: SchemaDetector::new(),
            rules: RuleEngine::new(),
            external: Some(external),
        }
    }

    /// The mode a pass will actually run in: external-first degrades to rule-only when
    /// no external classifier or no credential is available.
    pub fn effective_mode(&self) -> ClassificationMode {
        let external_ready = self
            .external
            .as_ref()
            .is_some_and(|external| external.has_credential());

        match self.settings.mode {
            ClassificationMode::ExternalFirst if external_ready => {
                ClassificationMode::ExternalFirst
            }
            _ => ClassificationMode::RuleOnly,
        }
    }

    pub async fn run(&self, text: &str, cancel: &CancellationToken) -> Result<IngestReport> {
        let batch_id = Uuid::new_v4();
        let normalized = self.normalizer.normalize(text);
        let schema = self.detector.detect(&normalized)?;
        let parser = RowParser::for_schema(&schema, self.settings.overflow);

        let mode = self.effective_mode();
        if mode != self.settings.mode {
            warn!("No external classification credential configured, using rule-based classification");
        }
        info!(
            "Starting ingestion {} ({:?}, external every {} rows)",
            batch_id, mode, self.settings.external_every
        );

        let rows: Vec<(usize, &str)> = normalized
            .split('\n')
            .enumerate()
            .skip(schema.header_line + 1)
            .filter(|(_, line)| !line.trim().is_empty())
            .collect();

        let context = RowContext {
            schema: &schema,
            parser: &parser,
            mode,
            ingested_at: Utc::now(),
            cancel,
        };

        let mut tracker = ProgressTracker::new(rows.len(), self.settings.show_progress);
        let mut messages = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;

        for (position, (line_index, line)) in rows.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracker.abandon();
                info!("Ingestion {} cancelled after {} rows", batch_id, position);
                return Err(TriageError::Cancelled);
            }

            match self.process_row(&context, position, line_index, line).await {
                Ok(message) => {
                    tracker.record_message(message.classified_by);
                    messages.push(message);
                }
                Err(TriageError::Cancelled) => {
                    tracker.abandon();
                    info!("Ingestion {} cancelled after {} rows", batch_id, position);
                    return Err(TriageError::Cancelled);
                }
                Err(e) => {
                    error!("Error parsing line {}: {}", line_index, e);
                    skipped += 1;
                    tracker.record_skipped();
                }
            }
        }

        tracker.finish();
        let stats = tracker.get_stats();

        info!(
            "Classification complete: {} messages via external service, {} via rules, {} fallbacks, {} rows skipped",
            stats.external_classified, stats.rule_classified, stats.fallback_classified, skipped
        );

        if mode == ClassificationMode::ExternalFirst
            && stats.external_classified == 0
            && stats.rows_processed > 0
        {
            error!("No messages were classified by the external service despite a configured credential");
        }

        if messages.is_empty() {
            return Err(TriageError::NoValidMessages { skipped });
        }

        Ok(IngestReport {
            batch_id,
            messages,
            skipped,
            effective_mode: mode,
            stats,
        })
    }

    async fn process_row(
        &self,
        context: &RowContext<'_>,
        position: usize,
        line_index: usize,
        line: &str,
    ) -> Result<Message> {
        let fields = context.parser.parse(line, line_index)?;
        let field = |index: usize| fields.get(index).map(|value| value.trim()).unwrap_or("");

        let columns = &context.schema.columns;
        let content = field(columns.message);
        let subject = field(columns.subject);

        if content.is_empty() && subject.is_empty() {
            return Err(TriageError::MalformedRow {
                line: line_index,
                reason: "row has neither a subject nor a message".to_string(),
            });
        }

        let subject = if subject.is_empty() {
            Message::DEFAULT_SUBJECT
        } else {
            subject
        };

        let id = match field(columns.id) {
            "" => format!("csv-{}", line_index),
            id => id.to_string(),
        };

        let classification = self.classify(context, position, subject, content).await?;

        debug!(
            "Row {} classified as {}/{} by {:?} (confidence {:.2})",
            line_index,
            classification.level,
            classification.category,
            classification.source,
            classification.confidence
        );

        Ok(Message {
            id,
            subject: subject.to_string(),
            content: content.to_string(),
            datetime: resolve_timestamp(field(columns.datetime), context.ingested_at),
            triage_level: classification.level,
            triage_category: classification.category,
            classified_by: classification.source,
        })
    }

    /// Only fails with `Cancelled`; external errors degrade to the rule engine.
    async fn classify(
        &self,
        context: &RowContext<'_>,
        position: usize,
        subject: &str,
        content: &str,
    ) -> Result<ClassificationResult> {
        let sampled = position % self.settings.external_every.max(1) == 0;

        if context.mode == ClassificationMode::ExternalFirst
            && sampled
            && let Some(external) = &self.external
        {
            let outcome = external.classify(subject, content).await;

            if context.cancel.is_cancelled() {
                return Err(TriageError::Cancelled);
            }

            return Ok(match outcome {
                Ok(result) => result.with_source(ClassificationSource::External),
                Err(e) => {
                    warn!(
                        "External classification failed for row {}, falling back to rules: {}",
                        position + 1,
                        e
                    );
                    self.rules
                        .classify(subject, content)
                        .with_source(ClassificationSource::RuleFallback)
                }
            });
        }

        Ok(self.rules.classify(subject, content))
    }
}
