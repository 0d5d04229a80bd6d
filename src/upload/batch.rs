use crate::upload::endpoint::UploadEndpoint;
use crate::upload::types::{BatchResult, FileOutcome, FileStatus, UploadStatus};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use tracing::info;

/// Submits every file, one at a time, and collects the outcomes.
///
/// A failed file never stops the batch. The only side effect is the optional
/// progress channel; notifications and snapshot writes belong to the caller.
pub async fn submit_batch<E: UploadEndpoint>(
    endpoint: &E,
    files: &[PathBuf],
    category: &str,
    progress: Option<&Sender<FileStatus>>,
) -> BatchResult {
    let mut outcomes = Vec::with_capacity(files.len());

    for file_path in files {
        let file_name = file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        send_status(progress, &file_name, UploadStatus::Processing);

        let result = endpoint.upload(file_path, category).await;

        let status = if result.accepted {
            UploadStatus::Accepted(result.message.clone())
        } else {
            UploadStatus::Rejected(result.message.clone())
        };
        send_status(progress, &file_name, status);

        outcomes.push(FileOutcome { file_name, result });
    }

    let batch = BatchResult {
        category: category.to_string(),
        outcomes,
    };
    info!(
        "Batch for {} finished: {}/{} accepted",
        category,
        batch.accepted_count(),
        batch.outcomes.len()
    );
    batch
}

fn send_status(progress: Option<&Sender<FileStatus>>, name: &str, status: UploadStatus) {
    if let Some(sender) = progress {
        // The window may already be gone; nobody is left to tell.
        let _ = sender.send(FileStatus {
            name: name.to_string(),
            status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::types::UploadAttemptResult;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::Mutex;

    /// Replays scripted answers and records what it was asked to upload.
    struct ScriptedEndpoint {
        answers: Mutex<VecDeque<UploadAttemptResult>>,
        calls: Mutex<Vec<(String, String)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedEndpoint {
        fn new(answers: Vec<UploadAttemptResult>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    impl UploadEndpoint for ScriptedEndpoint {
        fn upload(
            &self,
            file: &Path,
            category: &str,
        ) -> impl Future<Output = UploadAttemptResult> + Send {
            let name = file.file_name().unwrap().to_string_lossy().to_string();
            self.calls.lock().unwrap().push((name, category.to_string()));
            async move {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_in_flight.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                let answer = self
                    .answers
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| UploadAttemptResult::rejected("no script"));
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                answer
            }
        }
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[tokio::test]
    async fn attempts_every_file_in_order_after_failures() {
        let endpoint = ScriptedEndpoint::new(vec![
            UploadAttemptResult::rejected("blurry"),
            UploadAttemptResult::rejected("too dark"),
            UploadAttemptResult::accepted("looks good"),
        ]);
        let files = paths(&["/tmp/a.png", "/tmp/b.png", "/tmp/c.jpg"]);

        let batch = submit_batch(&endpoint, &files, "Lab Report", None).await;

        let calls = endpoint.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("a.png".to_string(), "Lab Report".to_string()),
                ("b.png".to_string(), "Lab Report".to_string()),
                ("c.jpg".to_string(), "Lab Report".to_string()),
            ]
        );
        assert_eq!(batch.category, "Lab Report");
        assert_eq!(batch.outcomes.len(), 3);
        assert_eq!(batch.accepted_count(), 1);
        assert_eq!(batch.outcomes[1].result.message, "too dark");
    }

    #[tokio::test]
    async fn never_more_than_one_request_in_flight() {
        let endpoint = ScriptedEndpoint::new(vec![
            UploadAttemptResult::accepted("1"),
            UploadAttemptResult::accepted("2"),
            UploadAttemptResult::accepted("3"),
        ]);
        let files = paths(&["a.png", "b.png", "c.png"]);

        submit_batch(&endpoint, &files, "A", None).await;

        assert_eq!(endpoint.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reports_progress_for_each_file() {
        let endpoint = ScriptedEndpoint::new(vec![
            UploadAttemptResult::accepted("ok"),
            UploadAttemptResult::rejected("duplicate file"),
        ]);
        let (sender, receiver) = mpsc::channel();
        let files = paths(&["card.png", "card-back.png"]);

        submit_batch(&endpoint, &files, "Insurance Card", Some(&sender)).await;
        drop(sender);

        let statuses: Vec<FileStatus> = receiver.iter().collect();
        assert_eq!(statuses.len(), 4);
        assert!(matches!(statuses[0].status, UploadStatus::Processing));
        assert_eq!(statuses[0].name, "card.png");
        assert!(matches!(&statuses[1].status, UploadStatus::Accepted(m) if m == "ok"));
        assert!(matches!(statuses[2].status, UploadStatus::Processing));
        assert!(matches!(&statuses[3].status, UploadStatus::Rejected(m) if m == "duplicate file"));
    }

    #[tokio::test]
    async fn dropped_receiver_does_not_stop_the_batch() {
        let endpoint = ScriptedEndpoint::new(vec![
            UploadAttemptResult::accepted("1"),
            UploadAttemptResult::accepted("2"),
        ]);
        let (sender, receiver) = mpsc::channel();
        drop(receiver);

        let batch = submit_batch(&endpoint, &paths(&["a.png", "b.png"]), "A", Some(&sender)).await;

        assert_eq!(batch.accepted_count(), 2);
    }
}
