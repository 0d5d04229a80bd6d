//! Step-by-step document upload flow.
//!
//! The patient is walked through the category catalog one step at a time.
//! Each step accepts any number of batches; moving on is always an explicit
//! `advance`, whether or not anything was accepted. Network work happens
//! elsewhere: `select_files` hands back a [`BatchRequest`] and the caller
//! reports the outcome through `finish_batch`.

use crate::categories::{CategoryCatalog, DocumentCategory};
use crate::interaction::{InteractionSnapshot, InteractionStore};
use crate::notify::Notification;
use crate::upload::{BatchResult, FileStatus, UploadStatus};
use derivative::Derivative;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What the worker thread needs to run a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub files: Vec<PathBuf>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPhase<'a> {
    Idle,
    Uploading,
    Error(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Uploading, or the flow is already finishing.
    Ignored,
    Moved { step: usize },
    Finishing { at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    NotDue,
    Due(Instant),
    Completed,
}

#[derive(Debug, Clone)]
pub struct UploadSession {
    pub current_step: usize,
    pub is_uploading: bool,
    pub last_error: Option<String>,
    pub step_had_successful_upload: bool,
    pub current_file: Option<String>,
    /// Outcomes of the running batch already applied from live progress.
    pub applied_outcomes: usize,
}

impl Default for UploadSession {
    fn default() -> Self {
        Self {
            current_step: 1,
            is_uploading: false,
            last_error: None,
            step_had_successful_upload: false,
            current_file: None,
            applied_outcomes: 0,
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Sequencer {
    catalog: CategoryCatalog,
    store: InteractionStore,
    session: UploadSession,
    completion: Completion,
    completion_delay: Duration,
    #[derivative(Debug = "ignore")]
    on_complete: Box<dyn FnMut()>,
}

impl Sequencer {
    pub fn new(
        catalog: CategoryCatalog,
        store: InteractionStore,
        completion_delay: Duration,
        on_complete: impl FnMut() + 'static,
    ) -> Self {
        Self {
            catalog,
            store,
            session: UploadSession::default(),
            completion: Completion::NotDue,
            completion_delay,
            on_complete: Box::new(on_complete),
        }
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn total_steps(&self) -> usize {
        self.catalog.len()
    }

    pub fn current_category(&self) -> &DocumentCategory {
        self.catalog.at_step(self.session.current_step)
    }

    pub fn is_last_step(&self) -> bool {
        self.session.current_step >= self.catalog.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completion == Completion::Completed
    }

    pub fn is_finishing(&self) -> bool {
        self.completion != Completion::NotDue
    }

    pub fn phase(&self) -> StepPhase<'_> {
        if self.session.is_uploading {
            StepPhase::Uploading
        } else if let Some(error) = &self.session.last_error {
            StepPhase::Error(error)
        } else {
            StepPhase::Idle
        }
    }

    pub fn can_upload(&self) -> bool {
        !self.session.is_uploading && !self.is_finishing()
    }

    /// Stays enabled on a failing step so the patient can skip it.
    pub fn can_advance(&self) -> bool {
        !self.session.is_uploading && !self.is_finishing()
    }

    /// Starts a batch for the current category. An empty selection, or one made
    /// while uploads are disabled, changes nothing.
    pub fn select_files(&mut self, files: Vec<PathBuf>) -> Option<BatchRequest> {
        if files.is_empty() {
            debug!("Empty selection, nothing to upload");
            return None;
        }
        if !self.can_upload() {
            warn!("Ignoring selection of {} files, uploads are disabled", files.len());
            return None;
        }

        let category = self.current_category().label.clone();
        info!("Uploading {} files for {}", files.len(), category);

        self.session.is_uploading = true;
        self.session.applied_outcomes = 0;
        self.session.current_file = files
            .first()
            .and_then(|f| f.file_name())
            .map(|n| n.to_string_lossy().to_string());

        Some(BatchRequest { files, category })
    }

    /// Follows the worker as each file finishes. Accepted and rejected files
    /// take effect right away, so the snapshot is current mid-batch.
    pub fn note_progress(&mut self, status: &FileStatus) -> Option<Notification> {
        if !self.session.is_uploading {
            return None;
        }

        let category = self.current_category().label.clone();
        match &status.status {
            UploadStatus::Processing => {
                self.session.current_file = Some(status.name.clone());
                None
            }
            UploadStatus::Accepted(message) => {
                self.session.applied_outcomes += 1;
                Some(self.apply_outcome(&category, &status.name, true, message))
            }
            UploadStatus::Rejected(reason) => {
                self.session.applied_outcomes += 1;
                Some(self.apply_outcome(&category, &status.name, false, reason))
            }
        }
    }

    fn apply_outcome(
        &mut self,
        category: &str,
        file_name: &str,
        accepted: bool,
        message: &str,
    ) -> Notification {
        if accepted {
            self.session.step_had_successful_upload = true;
            self.store
                .set(Some(InteractionSnapshot::accepted(category, message)));
            Notification::success("Upload successful", message)
        } else {
            Notification::error("Upload failed", format!("{}: {}", file_name, message))
        }
    }

    /// Applies a finished batch: per-file effects not yet seen through
    /// `note_progress`, then the step-level verdict.
    pub fn finish_batch(&mut self, batch: &BatchResult) -> Vec<Notification> {
        if !self.session.is_uploading {
            warn!("Discarding batch for {} that was not started here", batch.category);
            return Vec::new();
        }

        let applied = self.session.applied_outcomes.min(batch.outcomes.len());
        let mut notifications = Vec::with_capacity(batch.outcomes.len() - applied + 1);
        for outcome in &batch.outcomes[applied..] {
            notifications.push(self.apply_outcome(
                &batch.category,
                &outcome.file_name,
                outcome.result.accepted,
                &outcome.result.message,
            ));
        }

        self.session.is_uploading = false;
        self.session.current_file = None;
        self.session.applied_outcomes = 0;

        if batch.any_accepted() {
            let accepted = batch.accepted_count();
            let total = batch.outcomes.len();
            self.session.last_error = None;
            notifications.push(Notification::info(
                "Documents processed",
                format!("{} of {} {} files accepted", accepted, total, batch.category),
            ));
        } else if let Some(reason) = batch.last_failure_reason() {
            let reason = if reason.trim().is_empty() {
                format!("Upload failed for {}. Please try again.", batch.category)
            } else {
                reason.to_string()
            };
            self.session.last_error = Some(reason);
            notifications.push(Notification::error(
                "Upload failed",
                format!("None of the {} files were accepted", batch.category),
            ));
        }

        notifications
    }

    /// Moves to the next category, or schedules completion on the last one.
    pub fn advance(&mut self, now: Instant) -> AdvanceOutcome {
        if !self.can_advance() {
            return AdvanceOutcome::Ignored;
        }

        self.session.last_error = None;

        let category = self.current_category().label.clone();
        if !self.session.step_had_successful_upload {
            info!("Moving on from {} without an accepted upload", category);
            self.store.set(Some(InteractionSnapshot::skipped(&category)));
        }

        if self.is_last_step() {
            let at = now + self.completion_delay;
            self.completion = Completion::Due(at);
            info!("Last category done, completing flow");
            return AdvanceOutcome::Finishing { at };
        }

        self.session.current_step += 1;
        self.session.step_had_successful_upload = false;
        self.session.current_file = None;
        debug!("Now on step {}", self.session.current_step);
        AdvanceOutcome::Moved {
            step: self.session.current_step,
        }
    }

    /// Fires the completion callback once the delay has passed. Returns true
    /// only on the call that fired it.
    pub fn poll_completion(&mut self, now: Instant) -> bool {
        match self.completion {
            Completion::Due(at) if now >= at => {
                self.completion = Completion::Completed;
                (self.on_complete)();
                true
            }
            _ => false,
        }
    }

    /// Starts the flow over from the first category. The last snapshot stays.
    pub fn restart(&mut self) {
        self.session = UploadSession::default();
        self.completion = Completion::NotDue;
    }

    pub fn upload_button_label(&self) -> String {
        if self.session.is_uploading {
            return format!(
                "Uploading {}...",
                self.session.current_file.as_deref().unwrap_or("")
            );
        }
        if self.is_finishing() {
            return "All Done!".to_string();
        }
        if self.session.last_error.is_some() {
            return format!("Retry Upload: {}", self.current_category().label);
        }
        format!("Upload {}", self.current_category().label)
    }

    pub fn advance_button_label(&self) -> &'static str {
        if self.is_last_step() {
            "Finish"
        } else {
            "Next Document"
        }
    }

    pub fn progress(&self) -> f32 {
        self.session.current_step as f32 / self.catalog.len() as f32
    }
}
