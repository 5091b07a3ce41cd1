// src/session.rs
//! The analysis state machine. `AnalysisSession` is the only owner of the
//! staged file and the request state; every transition goes through
//! `&mut self`.

use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::ServiceClient;
use crate::error::{AnalysisError, ValidationError};
use crate::file_validator::{FileCandidate, FileValidator, SelectedFile, SelectionEvent};
use crate::normalizer::normalize;
use crate::types::response::AnalysisResponse;
use crate::types::view_model::AnalysisResult;

/// Anything that can turn a staged CV into a raw analysis payload
pub trait AnalysisBackend {
    fn analyze(
        &self,
        file: &SelectedFile,
    ) -> impl Future<Output = Result<AnalysisResponse, AnalysisError>> + Send;

    /// Port quoted in the fallback error message
    fn port(&self) -> u16;
}

impl AnalysisBackend for ServiceClient {
    fn analyze(
        &self,
        file: &SelectedFile,
    ) -> impl Future<Output = Result<AnalysisResponse, AnalysisError>> + Send {
        self.analyze_cv(file)
    }

    fn port(&self) -> u16 {
        ServiceClient::port(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequestState {
    Idle,
    InFlight,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl AnalysisRequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Une analyse est déjà en cours; attendez qu'elle se termine")]
    Busy,
}

/// Ticket for the single outstanding attempt
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    attempt_id: Uuid,
    file: SelectedFile,
}

impl PendingAnalysis {
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

/// Read-only snapshot handed to renderers
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub state: &'a AnalysisRequestState,
    pub selected: Option<&'a SelectedFile>,
    pub selection_error: Option<&'a str>,
}

pub struct AnalysisSession<B> {
    backend: B,
    selected: Option<SelectedFile>,
    state: AnalysisRequestState,
    selection_error: Option<String>,
    in_flight: Option<Uuid>,
}

impl<B: AnalysisBackend> AnalysisSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            selected: None,
            state: AnalysisRequestState::Idle,
            selection_error: None,
            in_flight: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &AnalysisRequestState {
        &self.state
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn selection_error(&self) -> Option<&str> {
        self.selection_error.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            AnalysisRequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            state: &self.state,
            selected: self.selected.as_ref(),
            selection_error: self.selection_error.as_deref(),
        }
    }

    /// Stage a new CV. A valid file replaces the previous one and discards
    /// any result or error; an invalid one only records the error and leaves
    /// the staged file and the request state as they were.
    pub fn select(&mut self, candidate: Option<FileCandidate>) -> Result<(), SelectionError> {
        if self.state.is_in_flight() {
            warn!("Selection rejected while an analysis is in flight");
            return Err(SelectionError::Busy);
        }

        match FileValidator::validate_file(candidate) {
            Ok(file) => {
                info!("Staged {} ({} bytes)", file.name(), file.size_bytes());
                self.selected = Some(file);
                self.selection_error = None;
                self.state = AnalysisRequestState::Idle;
                Ok(())
            }
            Err(err) => {
                self.record_selection_error(&err);
                Err(err.into())
            }
        }
    }

    /// Same as `select`, starting from a picker or drop event
    pub async fn select_event(&mut self, event: SelectionEvent) -> Result<(), SelectionError> {
        if self.state.is_in_flight() {
            warn!("Selection rejected while an analysis is in flight");
            return Err(SelectionError::Busy);
        }

        match event.into_candidate().await {
            Ok(candidate) => self.select(Some(candidate)),
            Err(err) => {
                self.record_selection_error(&err);
                Err(err.into())
            }
        }
    }

    fn record_selection_error(&mut self, err: &ValidationError) {
        warn!("Selection rejected: {}", err);
        self.selection_error = Some(err.to_string());
    }

    /// Start an attempt. `None` when no file is staged or one is already
    /// in flight; nothing changes in that case.
    pub fn begin_submit(&mut self) -> Option<PendingAnalysis> {
        if self.state.is_in_flight() {
            return None;
        }
        let file = self.selected.clone()?;

        let attempt_id = Uuid::new_v4();
        info!("Analysis {} started for {}", attempt_id, file.name());

        self.in_flight = Some(attempt_id);
        self.selection_error = None;
        self.state = AnalysisRequestState::InFlight;
        Some(PendingAnalysis { attempt_id, file })
    }

    /// Deliver the outcome of `pending`. Outcomes for an attempt that is no
    /// longer in flight are dropped.
    pub fn complete(
        &mut self,
        pending: PendingAnalysis,
        outcome: Result<AnalysisResponse, AnalysisError>,
    ) {
        if self.in_flight != Some(pending.attempt_id) {
            warn!("Dropping outcome of stale attempt {}", pending.attempt_id);
            return;
        }
        self.in_flight = None;

        self.state = match outcome.and_then(|raw| normalize(&raw)) {
            Ok(result) => {
                info!(
                    "Analysis {} succeeded: {} occupations, {} offers, {} trainings",
                    pending.attempt_id,
                    result.occupations.len(),
                    result.job_offers.len(),
                    result.trainings.len()
                );
                AnalysisRequestState::Succeeded(result)
            }
            Err(err) => {
                warn!("Analysis {} failed: {}", pending.attempt_id, err);
                AnalysisRequestState::Failed(err.user_message(self.backend.port()))
            }
        };
    }

    /// begin + analyze + complete. Returns false when the submit was a no-op.
    pub async fn submit(&mut self) -> bool {
        let Some(pending) = self.begin_submit() else {
            return false;
        };
        let outcome = self.backend.analyze(pending.file()).await;
        self.complete(pending, outcome);
        true
    }

    /// "New analysis": back to an empty Idle session
    pub fn reset(&mut self) {
        if self.state.is_in_flight() {
            warn!("Reset ignored while an analysis is in flight");
            return;
        }
        self.selected = None;
        self.selection_error = None;
        self.state = AnalysisRequestState::Idle;
    }
}
