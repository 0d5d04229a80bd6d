mod batch;
mod endpoint;
mod filter;
mod types;

pub use batch::submit_batch;
pub use endpoint::{HttpUploadEndpoint, UploadEndpoint};
pub use filter::{FileFilter, DEFAULT_EXTENSIONS};
pub use types::{BatchResult, FileOutcome, FileStatus, UploadAttemptResult, UploadStatus};
