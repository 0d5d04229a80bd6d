#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadAttemptResult {
    pub accepted: bool,
    pub message: String,
}

impl UploadAttemptResult {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            accepted: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum UploadStatus {
    Processing,
    Accepted(String),
    Rejected(String),
}

/// Live progress message sent from the upload thread.
#[derive(Debug, Clone)]
pub struct FileStatus {
    pub name: String,
    pub status: UploadStatus,
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file_name: String,
    pub result: UploadAttemptResult,
}

/// Per-file outcomes of one file-picker selection, in submission order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub category: String,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.accepted).count()
    }

    pub fn any_accepted(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.accepted)
    }

    pub fn last_failure_reason(&self) -> Option<&str> {
        self.outcomes
            .iter()
            .rev()
            .find(|o| !o.result.accepted)
            .map(|o| o.result.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, result: UploadAttemptResult) -> FileOutcome {
        FileOutcome {
            file_name: name.to_string(),
            result,
        }
    }

    #[test]
    fn aggregates_mixed_batch() {
        let batch = BatchResult {
            category: "Lab Report".to_string(),
            outcomes: vec![
                outcome("a.png", UploadAttemptResult::rejected("blurry")),
                outcome("b.png", UploadAttemptResult::accepted("first ok")),
                outcome("c.png", UploadAttemptResult::accepted("second ok")),
                outcome("d.png", UploadAttemptResult::rejected("duplicate file")),
            ],
        };

        assert_eq!(batch.accepted_count(), 2);
        assert!(batch.any_accepted());
        assert_eq!(batch.last_failure_reason(), Some("duplicate file"));
    }

    #[test]
    fn empty_batch_has_nothing() {
        let batch = BatchResult {
            category: "A".to_string(),
            outcomes: Vec::new(),
        };
        assert!(!batch.any_accepted());
        assert_eq!(batch.last_failure_reason(), None);
    }
}
