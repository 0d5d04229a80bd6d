mod state;
mod ui;

use crate::config::Config;
use crate::error::ConfigError;
use crate::interaction::InteractionStore;
use crate::notify::{Notification, ToastQueue};
use crate::sequencer::{AdvanceOutcome, BatchRequest, Sequencer};
use crate::upload::{
    submit_batch, BatchResult, FileFilter, FileOutcome, HttpUploadEndpoint, UploadAttemptResult,
};
use crate::utils::file_size::FileSizeUtils;
use crate::voice::VoiceAgent;
use eframe::{egui, App};
use state::UploadState;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc as std_mpsc;
use std::time::Instant;
use tracing::{debug, error, info};

pub struct IntakeUploader {
    endpoint: HttpUploadEndpoint,
    filter: FileFilter,
    sequencer: Sequencer,
    voice: VoiceAgent,
    toasts: ToastQueue,
    state: UploadState,
    finished: Rc<Cell<bool>>,
}

impl IntakeUploader {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &Config,
        endpoint: HttpUploadEndpoint,
    ) -> Result<Self, ConfigError> {
        info!("Initializing document uploader against {}", endpoint.url());

        let store = InteractionStore::new();
        let finished = Rc::new(Cell::new(false));
        let on_complete = {
            let finished = finished.clone();
            move || finished.set(true)
        };

        Ok(Self {
            endpoint,
            filter: FileFilter::new(&config.accepted_extensions),
            sequencer: Sequencer::new(
                config.catalog()?,
                store.clone(),
                config.completion_delay(),
                on_complete,
            ),
            voice: VoiceAgent::new(store),
            toasts: ToastQueue::new(config.toast_lifetime()),
            state: UploadState::default(),
            finished,
        })
    }

    pub fn pick_files(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title(format!("Select your {}", self.sequencer.current_category().label))
            .add_filter("Images", self.filter.extensions())
            .pick_files();

        // Cancelled picker.
        let Some(files) = picked else {
            return;
        };
        self.submit_selection(files);
    }

    /// Shared by the picker and drag-and-drop.
    pub fn submit_selection(&mut self, files: Vec<PathBuf>) {
        let (supported, notices) = filter_selection(&self.filter, files);
        self.toasts.extend(notices, Instant::now());

        let summary = FileSizeUtils::summarize(&supported);
        if let Some(request) = self.sequencer.select_files(supported) {
            self.state.clear_step();
            self.state.selection_summary = Some(summary);
            self.start_batch(request);
        }
    }

    fn start_batch(&mut self, request: BatchRequest) {
        let (status_sender, status_receiver) = std_mpsc::channel();
        let (batch_sender, batch_receiver) = std_mpsc::channel();
        self.state.status_receiver = Some(status_receiver);
        self.state.batch_receiver = Some(batch_receiver);

        let endpoint = self.endpoint.clone();

        std::thread::spawn(move || {
            let batch = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(submit_batch(
                    &endpoint,
                    &request.files,
                    &request.category,
                    Some(&status_sender),
                )),
                Err(e) => {
                    error!("Failed to start upload runtime: {}", e);
                    runtime_failure(&request, &e.to_string())
                }
            };

            // Receiver is gone if the window closed meanwhile.
            let _ = batch_sender.send(batch);
        });
    }

    pub fn advance(&mut self) {
        match self.sequencer.advance(Instant::now()) {
            AdvanceOutcome::Ignored => {}
            AdvanceOutcome::Moved { step } => {
                debug!("Advanced to step {}", step);
                self.state.clear_step();
            }
            AdvanceOutcome::Finishing { at } => {
                debug!(
                    "Completion due in {:?}",
                    at.saturating_duration_since(Instant::now())
                );
                self.toasts.push(
                    Notification::success(
                        "All documents submitted",
                        "Thank you! Your doctor will review them before your appointment.",
                    ),
                    Instant::now(),
                );
            }
        }
    }

    pub fn restart(&mut self) {
        info!("Restarting upload flow");
        self.sequencer.restart();
        self.voice.stop();
        self.state.clear();
        self.finished.set(false);
    }

    fn drain_statuses(&mut self, now: Instant) {
        let Some(receiver) = &self.state.status_receiver else {
            return;
        };
        let updates: Vec<_> = receiver.try_iter().collect();
        for status in updates {
            if let Some(notification) = self.sequencer.note_progress(&status) {
                self.toasts.push(notification, now);
            }
            self.state.record(status);
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let now = Instant::now();

        let dropped = ctx.input(|i| dropped_paths(&i.raw.dropped_files));
        if !dropped.is_empty() {
            debug!("{} files dropped on the window", dropped.len());
            self.submit_selection(dropped);
        }

        self.drain_statuses(now);

        let finished_batch = self
            .state
            .batch_receiver
            .as_ref()
            .and_then(|receiver| receiver.try_recv().ok());
        if let Some(batch) = finished_batch {
            // Statuses sent just before the batch result may not have been seen yet.
            self.drain_statuses(now);
            self.state.detach_worker();
            let notifications = self.sequencer.finish_batch(&batch);
            self.toasts.extend(notifications, now);
        }

        if self.sequencer.poll_completion(now) {
            info!("Upload flow completed");
        }

        if self.sequencer.session().is_uploading {
            ctx.request_repaint();
        } else if self.sequencer.is_finishing() && !self.sequencer.is_completed() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if let Some(next_expiry) = self.toasts.prune(now) {
            ctx.request_repaint_after(next_expiry);
        }
    }
}

/// Drops the unsupported files from a selection, with one notice each.
fn filter_selection(filter: &FileFilter, files: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<Notification>) {
    let (supported, rejected) = filter.partition(files);
    let notices = rejected
        .iter()
        .map(|file| {
            let name = file.file_name().unwrap_or_default().to_string_lossy();
            Notification::error(
                "Invalid file type",
                format!("{} is not a {} file.", name, filter.describe()),
            )
        })
        .collect();
    (supported, notices)
}

/// Dropped entries without a path (web-only byte payloads) are skipped.
fn dropped_paths(files: &[egui::DroppedFile]) -> Vec<PathBuf> {
    files.iter().filter_map(|f| f.path.clone()).collect()
}

/// Every file rejected with the same reason, so the step still leaves `Uploading`.
fn runtime_failure(request: &BatchRequest, reason: &str) -> BatchResult {
    BatchResult {
        category: request.category.clone(),
        outcomes: request
            .files
            .iter()
            .map(|f| FileOutcome {
                file_name: f.file_name().unwrap_or_default().to_string_lossy().to_string(),
                result: UploadAttemptResult::rejected(format!(
                    "Failed to start upload: {}",
                    reason
                )),
            })
            .collect(),
    }
}

impl App for IntakeUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
