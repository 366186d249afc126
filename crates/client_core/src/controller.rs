//! Interaction controller: the single owner of editor, request and banner
//! state. Every user action and every completion is one method call that
//! moves the state synchronously.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::{
    client::GenerationService,
    clipboard::ClipboardService,
    error::GenerationError,
    export::ExportService,
    sample::SAMPLE_SOURCE,
    timer::ExpiryTimer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Source,
    Generated,
}

impl Pane {
    pub fn default_filename(self) -> &'static str {
        match self {
            Pane::Source => "under_test.py",
            Pane::Generated => "test_generated.py",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pane::Source => "source",
            Pane::Generated => "generated tests",
        }
    }
}

/// Submission-time snapshot handed to the transport. Later edits to the source
/// pane do not change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub id: u64,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    source: String,
    generated: String,
    request_state: RequestState,
    error: Option<String>,
    copied: ExpiryTimer,
    in_flight: Option<u64>,
    next_ticket: u64,
    last_generated_at: Option<DateTime<Local>>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl InteractionController {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            generated: String::new(),
            request_state: RequestState::Idle,
            error: None,
            copied: ExpiryTimer::default(),
            in_flight: None,
            next_ticket: 1,
            last_generated_at: None,
        }
    }

    pub fn with_sample() -> Self {
        Self::new(SAMPLE_SOURCE)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut String {
        &mut self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn load_sample(&mut self) {
        self.source = SAMPLE_SOURCE.to_string();
    }

    pub fn clear_source(&mut self) {
        self.source.clear();
    }

    pub fn generated(&self) -> &str {
        &self.generated
    }

    pub fn generated_mut(&mut self) -> &mut String {
        &mut self.generated
    }

    pub fn text(&self, pane: Pane) -> &str {
        match pane {
            Pane::Source => &self.source,
            Pane::Generated => &self.generated,
        }
    }

    /// Copy and export actions are offered only for panes with visible text.
    pub fn has_text(&self, pane: Pane) -> bool {
        !self.text(pane).trim().is_empty()
    }

    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    pub fn is_in_flight(&self) -> bool {
        self.request_state == RequestState::InFlight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn copied(&self) -> bool {
        self.copied.is_armed()
    }

    pub fn copied_remaining(&self, now: Instant) -> Option<Duration> {
        self.copied.remaining(now)
    }

    pub fn last_generated_at(&self) -> Option<DateTime<Local>> {
        self.last_generated_at
    }

    pub fn can_generate(&self) -> bool {
        !self.source.trim().is_empty() && !self.is_in_flight()
    }

    /// Starts a request if the trigger is enabled. Returns `None` and leaves
    /// every field untouched otherwise.
    pub fn begin_generation(&mut self) -> Option<GenerationTicket> {
        if !self.can_generate() {
            return None;
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.request_state = RequestState::InFlight;
        self.error = None;
        self.generated.clear();
        self.in_flight = Some(id);
        info!(ticket = id, bytes = self.source.len(), "generation started");

        Some(GenerationTicket {
            id,
            source: self.source.clone(),
        })
    }

    /// Applies the outcome of the in-flight request. Completions for any other
    /// ticket are ignored and return false.
    pub fn complete_generation(
        &mut self,
        ticket_id: u64,
        outcome: Result<String, GenerationError>,
    ) -> bool {
        if self.in_flight != Some(ticket_id) {
            warn!(ticket = ticket_id, "ignoring completion for a request that is not in flight");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(test_code) => {
                info!(ticket = ticket_id, bytes = test_code.len(), "generation succeeded");
                self.generated = test_code;
                self.request_state = RequestState::Succeeded;
                self.last_generated_at = Some(Local::now());
            }
            Err(err) => {
                let message = match err.message().trim() {
                    "" => "Request failed".to_string(),
                    _ => err.message().to_string(),
                };
                warn!(ticket = ticket_id, transport = err.is_transport(), "generation failed: {message}");
                self.generated.clear();
                self.error = Some(message);
                self.request_state = RequestState::Failed;
            }
        }
        true
    }

    /// Copies the pane's text and arms the copied banner on success.
    pub fn copy_pane(&mut self, clipboard: &mut ClipboardService, pane: Pane, now: Instant) -> bool {
        let copied = clipboard.copy(self.text(pane));
        if copied {
            self.copied.arm(now);
        }
        copied
    }

    /// Writes the pane's text under its default filename.
    pub fn export_pane(&self, export: &ExportService, pane: Pane) -> anyhow::Result<PathBuf> {
        export.download(pane.default_filename(), self.text(pane))
    }

    /// Expires the copied banner when due. Returns true if it just expired.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.copied.expire_if_due(now)
    }
}

/// Runs one full request: begin, await the service, complete. Returns the
/// resulting state, or `None` when the trigger was disabled.
pub async fn run_generation(
    controller: &mut InteractionController,
    service: &dyn GenerationService,
) -> Option<RequestState> {
    let ticket = controller.begin_generation()?;
    let outcome = service.generate(&ticket.source).await;
    controller.complete_generation(ticket.id, outcome);
    Some(controller.request_state())
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
