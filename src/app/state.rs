use crate::upload::{BatchResult, FileStatus, UploadStatus};
use std::sync::mpsc::Receiver;

/// Per-window upload bookkeeping that the sequencer does not need to know about.
#[derive(Default)]
pub struct UploadState {
    pub file_statuses: Vec<FileStatus>,
    pub selection_summary: Option<String>,
    pub show_details: bool,
    pub status_receiver: Option<Receiver<FileStatus>>,
    pub batch_receiver: Option<Receiver<BatchResult>>,
}

impl UploadState {
    pub fn clear(&mut self) {
        *self = UploadState::default();
    }

    /// Forgets the finished files of the previous category.
    pub fn clear_step(&mut self) {
        self.file_statuses.clear();
        self.selection_summary = None;
    }

    /// Drops the channels so a late result from a running batch is never applied.
    pub fn detach_worker(&mut self) {
        self.status_receiver = None;
        self.batch_receiver = None;
    }

    /// (accepted, rejected) among the finished files of this step.
    pub fn counts(&self) -> (usize, usize) {
        self.file_statuses
            .iter()
            .fold((0, 0), |(ok, failed), status| match status.status {
                UploadStatus::Accepted(_) => (ok + 1, failed),
                UploadStatus::Rejected(_) => (ok, failed + 1),
                UploadStatus::Processing => (ok, failed),
            })
    }

    pub fn get_status_text(&self) -> String {
        let (accepted, rejected) = self.counts();
        if accepted + rejected == 0 {
            return String::new();
        }
        format!("✅ Accepted: {} | ❌ Rejected: {}", accepted, rejected)
    }

    /// Records a progress message. Finished entries replace the pending one.
    pub fn record(&mut self, status: FileStatus) {
        if !matches!(status.status, UploadStatus::Processing) {
            if let Some(pending) = self
                .file_statuses
                .iter_mut()
                .rev()
                .find(|s| s.name == status.name && matches!(s.status, UploadStatus::Processing))
            {
                *pending = status;
                return;
            }
        }
        self.file_statuses.push(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(name: &str, status: UploadStatus) -> FileStatus {
        FileStatus {
            name: name.to_string(),
            status,
        }
    }

    #[test]
    fn finished_status_replaces_pending_entry() {
        let mut state = UploadState::default();
        state.record(status("a.png", UploadStatus::Processing));
        state.record(status("a.png", UploadStatus::Accepted("ok".to_string())));
        state.record(status("b.png", UploadStatus::Processing));
        state.record(status("b.png", UploadStatus::Rejected("duplicate file".to_string())));

        assert_eq!(state.file_statuses.len(), 2);
        assert_eq!(state.counts(), (1, 1));
        assert_eq!(state.get_status_text(), "✅ Accepted: 1 | ❌ Rejected: 1");
    }

    #[test]
    fn resubmitted_file_gets_its_own_entry() {
        let mut state = UploadState::default();
        state.record(status("a.png", UploadStatus::Processing));
        state.record(status("a.png", UploadStatus::Rejected("blurry".to_string())));
        state.record(status("a.png", UploadStatus::Processing));
        state.record(status("a.png", UploadStatus::Accepted("ok".to_string())));

        assert_eq!(state.file_statuses.len(), 2);
        assert_eq!(state.counts(), (1, 1));
    }

    #[test]
    fn clear_step_keeps_channels() {
        let mut state = UploadState::default();
        let (_tx, rx) = std::sync::mpsc::channel();
        state.batch_receiver = Some(rx);
        state.record(status("a.png", UploadStatus::Processing));

        state.clear_step();

        assert!(state.file_statuses.is_empty());
        assert!(state.batch_receiver.is_some());
        assert_eq!(state.get_status_text(), "");
    }
}
