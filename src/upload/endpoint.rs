use crate::error::UploadError;
use crate::upload::types::UploadAttemptResult;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Anything that can take one file for a category and say yes or no.
pub trait UploadEndpoint {
    fn upload(
        &self,
        file: &Path,
        category: &str,
    ) -> impl Future<Output = UploadAttemptResult> + Send;
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default = "accepted_by_default")]
    success: bool,
    #[serde(default)]
    msg: Option<String>,
}

fn accepted_by_default() -> bool {
    true
}

/// Multipart POST to the intake backend.
#[derive(Clone)]
pub struct HttpUploadEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpUploadEndpoint {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, file_path: &Path, category: &str) -> Result<String, UploadError> {
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(UploadError::InvalidFileName)?
            .to_string();

        let bytes = tokio::fs::read(file_path).await?;
        debug!("Read {} bytes from {}", bytes.len(), file_name);

        let mime = mime_guess::from_path(file_path).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime.as_ref())
            .map_err(UploadError::Request)?;
        let form = Form::new()
            .part("file", part)
            .text("doc_type", category.to_string());

        // The intake backend reads doc_type from the query string.
        let response = self
            .client
            .post(&self.url)
            .query(&[("doc_type", category)])
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Http(status));
        }

        let body = response
            .json::<UploadResponse>()
            .await
            .map_err(UploadError::Decode)?;

        if body.success {
            Ok(body
                .msg
                .unwrap_or_else(|| format!("{} uploaded successfully!", category)))
        } else {
            Err(UploadError::Rejected(body.msg.unwrap_or_else(|| {
                format!("Upload failed for {}. Please try again.", category)
            })))
        }
    }
}

impl UploadEndpoint for HttpUploadEndpoint {
    async fn upload(&self, file: &Path, category: &str) -> UploadAttemptResult {
        info!("Sending {} as {} to {}", file.display(), category, self.url);
        match self.send(file, category).await {
            Ok(message) => {
                info!("Upload accepted for {}: {}", category, message);
                UploadAttemptResult::accepted(message)
            }
            Err(e) => {
                warn!("Upload rejected for {}: {}", category, e);
                UploadAttemptResult::rejected(e.to_string())
            }
        }
    }
}
