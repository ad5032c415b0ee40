// file: src/session.rs
// description: transient in-memory triage state for one user session
// reference: internal state management

use crate::mock::mock_messages;
use crate::models::{FilterState, Message};
use crate::pipeline::{CancellationToken, IngestReport};
use crate::query::{TriageSummary, filter_messages};
use tracing::{debug, info};
use uuid::Uuid;

/// Where the current batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrigin {
    Empty,
    Mock,
    Upload(Uuid),
}

/// Owns the current message batch and view criteria. A new upload replaces the batch
/// wholesale and cancels any upload still in flight.
pub struct TriageSession {
    messages: Vec<Message>,
    origin: BatchOrigin,
    filters: FilterState,
    in_flight: Option<CancellationToken>,
}

impl TriageSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            origin: BatchOrigin::Empty,
            filters: FilterState::default(),
            in_flight: None,
        }
    }

    pub fn with_mock_data() -> Self {
        let mut session = Self::new();
        session.load_mock();
        session
    }

    pub fn load_mock(&mut self) {
        self.cancel_in_flight();
        self.messages = mock_messages();
        self.origin = BatchOrigin::Mock;
        info!("Loaded {} sample messages", self.messages.len());
    }

    /// Starts a new upload, cancelling the previous one if it has not completed.
    pub fn begin_upload(&mut self) -> CancellationToken {
        self.begin_upload_with(CancellationToken::new())
    }

    /// Like [`begin_upload`](Self::begin_upload) but tracks a caller-owned token, e.g.
    /// one already wired to an interrupt handler.
    pub fn begin_upload_with(&mut self, token: CancellationToken) -> CancellationToken {
        self.cancel_in_flight();
        self.in_flight = Some(token.clone());
        token
    }

    /// Installs the report's messages if `token` still belongs to the current upload.
    /// Returns false for superseded or cancelled uploads, leaving the batch untouched.
    pub fn complete_upload(&mut self, token: &CancellationToken, report: IngestReport) -> bool {
        let current = self
            .in_flight
            .as_ref()
            .is_some_and(|active| active.same_as(token));

        if !current || token.is_cancelled() {
            debug!("Discarding superseded upload {}", report.batch_id);
            return false;
        }

        self.in_flight = None;
        self.origin = BatchOrigin::Upload(report.batch_id);
        self.messages = report.messages;
        info!("Loaded {} messages from upload", self.messages.len());
        true
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn origin(&self) -> BatchOrigin {
        self.origin
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn visible_messages(&self) -> Vec<&Message> {
        filter_messages(&self.messages, &self.filters)
    }

    /// Counts over the whole batch, independent of the current filters.
    pub fn summary(&self) -> TriageSummary {
        TriageSummary::from_messages(&self.messages)
    }

    fn cancel_in_flight(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
            debug!("Cancelled in-flight upload");
        }
    }
}

impl Default for TriageSession {
    fn default() -> Self {
        Self::new()
    }
}
