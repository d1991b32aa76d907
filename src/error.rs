//! Error types for the lister.

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::list_objects::ListObjectsError;
use thiserror::Error;

/// A failed list request.
///
/// Transport, authentication, missing bucket and throttling failures all land
/// here. The message is whatever the store reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ListError {
    message: String,
}

impl ListError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SdkError<ListObjectsError>> for ListError {
    fn from(err: SdkError<ListObjectsError>) -> Self {
        // Prefer the message from the service response; fall back to the
        // full error chain for dispatch/timeout failures that have none.
        let message = err
            .as_service_error()
            .and_then(|e| e.message())
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
        Self::new(message)
    }
}

/// Reasons a listing run ends in failure.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    List(#[from] ListError),

    /// Progress could not be written
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
